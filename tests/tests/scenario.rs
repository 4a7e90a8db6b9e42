mod utils;
use utils::*;

use carga::prelude::*;
use mock_service::MockService;
use std::time::Duration;
use taller_carga::{AdminConfig, AdminUser, ClienteUser, EquipoUser, MantenimientoUser};

#[tokio::test]
#[ntest::timeout(10_000)]
async fn cliente_scenario_cleans_up_after_itself() {
    let mock = MockService::new();
    let api = start(&mock).await;

    let stats = Scenario::new("cliente", move || ClienteUser::new(api.clone()))
        .users(3)
        .spawn_rate(100)
        .iterations(2)
        .wait_time(WaitTime::none())
        .await
        .unwrap();

    assert_eq!(stats.users, 3);
    assert_eq!(stats.iterations, 6);

    // 4 on start plus 1 per iteration, per user.
    let creates = stats.transaction("crear_cliente").unwrap();
    assert_eq!(creates.success, 18);
    assert_eq!(creates.error, 0);

    // Task deletes plus the on_stop cleanup remove everything created.
    assert_eq!(stats.transaction("eliminar_cliente").unwrap().success, 18);
    assert!(mock.cliente_ids().is_empty());
    assert_eq!(stats.error_rate(), 0.);
}

#[tokio::test]
#[ntest::timeout(10_000)]
async fn equipo_scenario_counts_each_endpoint() {
    let mock = MockService::new();
    let api = start(&mock).await;

    let stats = Scenario::new("equipo", move || EquipoUser::new(api.clone()))
        .users(2)
        .spawn_rate(100)
        .iterations(5)
        .wait_time(WaitTime::none())
        .await
        .unwrap();

    assert_eq!(stats.iterations, 10);
    for label in [
        "crear_cliente",
        "crear_equipo",
        "actualizar_equipo",
        "detalle_equipo",
        "eliminar_equipo",
    ] {
        let transaction = stats.transaction(label).unwrap();
        assert_eq!(transaction.error, 0, "{label} failed: {transaction:?}");
    }
    assert_eq!(stats.transaction("crear_cliente").unwrap().success, 8);
    assert_eq!(stats.transaction("crear_equipo").unwrap().success, 8);
    assert_eq!(stats.transaction("eliminar_equipo").unwrap().success, 2);

    // No cleanup on stop: the undeleted equipment stays behind.
    assert_eq!(mock.equipo_ids().len(), 6);
}

#[tokio::test]
#[ntest::timeout(10_000)]
async fn mantenimiento_scenario_runs_for_its_duration() {
    let mock = MockService::new().with_mantenimientos([(1, 10), (2, 10), (3, 11)]);
    let api = start(&mock).await;

    let stats = Scenario::new("mantenimiento", move || MantenimientoUser::new(api.clone()))
        .users(2)
        .spawn_rate(100)
        .duration(Duration::from_millis(500))
        .wait_time(WaitTime::between(
            Duration::from_millis(10),
            Duration::from_millis(30),
        ))
        .await
        .unwrap();

    assert!(stats.iterations >= 4, "only {} iterations", stats.iterations);
    assert!(stats.elapsed >= Duration::from_millis(500));
    assert!(stats.transaction("listar_mantenimientos").unwrap().success >= 2);
    assert_eq!(stats.total_error(), 0);
}

#[tokio::test]
#[ntest::timeout(10_000)]
async fn admin_errors_are_counted_per_transaction() {
    let mock = MockService::new();
    let api = start(&mock).await;
    let admin = AdminConfig {
        id: "99".to_string(),
        password: "otra_password".to_string(),
        ..AdminConfig::default()
    };

    let stats = Scenario::new("admin", move || AdminUser::new(api.clone(), admin.clone()))
        .users(1)
        .iterations(30)
        .wait_time(WaitTime::none())
        .await
        .unwrap();

    assert_eq!(stats.iterations, 30);
    assert_eq!(stats.total(), 30);

    // Wrong password and unknown id: every login and update fails, recovery still works.
    let failing = ["login_admin", "actualizar_admin"]
        .iter()
        .filter_map(|label| stats.transaction(label))
        .inspect(|t| assert_eq!(t.success, 0))
        .map(|t| t.error)
        .sum::<u64>();
    assert_eq!(stats.total_error(), failing);
    assert_eq!(
        stats.transaction("recuperar_password").map_or(0, |t| t.error),
        0
    );
}

#[tokio::test]
#[ntest::timeout(5_000)]
async fn invalid_configuration_is_rejected() {
    let mock = MockService::new();
    let api = start(&mock).await;

    let res = Scenario::new("cliente", move || ClienteUser::new(api.clone()))
        .users(0)
        .await;

    assert_eq!(res.unwrap_err(), ConfigError::NoUsers);
    assert!(mock.requests().is_empty());
}
