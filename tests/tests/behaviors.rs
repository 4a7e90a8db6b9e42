mod utils;
use utils::*;

use carga::prelude::*;
use mock_service::{Faults, Method, MockService};
use serde_json::json;
use std::collections::HashSet;
use taller_carga::api::ApiError;
use taller_carga::model::ClientePayload;
use taller_carga::users::{
    AdminTask, ClienteTask, EquipoTask, MantenimientoTask, Step, INITIAL_CLIENTES,
};
use taller_carga::{AdminConfig, AdminUser, ClienteUser, EntityId, EquipoUser, MantenimientoUser};
use tokio::time::Duration;
use tracing_test::traced_test;

const GET: Method = Method::GET;

fn numbers(ids: impl IntoIterator<Item = i64>) -> Vec<EntityId> {
    ids.into_iter().map(EntityId::Number).collect()
}

/* Cliente */

#[tokio::test]
#[ntest::timeout(5_000)]
async fn cliente_start_caches_every_created_id() {
    let mock = MockService::new();
    let mut user = ClienteUser::with_rng(start(&mock).await, seeded(1));

    user.on_start().await;

    assert_eq!(user.clientes().len(), INITIAL_CLIENTES);
    let cached: Vec<EntityId> = user.clientes().iter().cloned().collect();
    assert_eq!(cached, numbers(mock.cliente_ids()));
}

#[tokio::test]
#[ntest::timeout(5_000)]
async fn cliente_task_runs_crud_in_order() {
    let mock = MockService::new();
    let mut user = ClienteUser::with_rng(start(&mock).await, seeded(2));

    user.on_start().await;
    user.run(ClienteTask::EjecutarTareas).await;

    let methods: Vec<String> = mock
        .requests()
        .iter()
        .skip(INITIAL_CLIENTES)
        .map(|r| format!("{} {}", r.method, r.path.trim_end_matches(char::is_numeric)))
        .collect();
    assert_eq!(
        methods,
        [
            "POST /api/cliente",
            "GET /api/cliente/",
            "PUT /api/cliente/",
            "GET /api/clientes",
            "DELETE /api/cliente/",
        ]
    );

    // One extra client created, one deleted.
    assert_eq!(user.clientes().len(), INITIAL_CLIENTES);
    assert_eq!(mock.cliente_ids().len(), INITIAL_CLIENTES);
}

#[traced_test]
#[tokio::test]
#[ntest::timeout(5_000)]
async fn cliente_cleanup_without_clients_sends_nothing() {
    let mock = MockService::new();
    let mut user = ClienteUser::with_rng(start(&mock).await, seeded(3));

    user.on_stop().await;

    assert!(mock.requests().is_empty());
    assert!(logs_contain("No clients registered to clean up"));
}

#[traced_test]
#[tokio::test]
#[ntest::timeout(5_000)]
async fn cliente_cleanup_continues_past_failed_deletes() {
    let mock = MockService::new();
    let mut user = ClienteUser::with_rng(start(&mock).await, seeded(4));

    user.on_start().await;
    mock.set_faults(Faults {
        fail_cliente_delete: true,
        ..Faults::default()
    });
    user.on_stop().await;

    assert_eq!(
        mock.count(Method::DELETE, "/api/cliente/"),
        INITIAL_CLIENTES
    );
    assert!(user.clientes().is_empty());
    assert_eq!(mock.cliente_ids().len(), INITIAL_CLIENTES);
    assert!(logs_contain("Deleting client 1 failed: status 500"));
    assert!(logs_contain("Deleting client 4 failed"));
    assert!(logs_contain("All clients cleaned up"));
}

#[tokio::test]
#[ntest::timeout(5_000)]
async fn cliente_cleanup_deletes_everything() {
    let mock = MockService::new();
    let mut user = ClienteUser::with_rng(start(&mock).await, seeded(5));

    user.on_start().await;
    user.on_stop().await;

    assert!(user.clientes().is_empty());
    assert!(mock.cliente_ids().is_empty());
}

#[traced_test]
#[tokio::test]
#[ntest::timeout(5_000)]
async fn cliente_without_id_in_response_is_not_cached() {
    let mock = MockService::new();
    mock.set_faults(Faults {
        omit_created_id: true,
        ..Faults::default()
    });
    let mut user = ClienteUser::with_rng(start(&mock).await, seeded(6));

    user.on_start().await;
    user.run(ClienteTask::EjecutarTareas).await;

    assert!(user.clientes().is_empty());
    assert!(logs_contain("no id in response"));
    assert!(logs_contain("No clients registered to delete"));
    // Only the creates and the list went out; nothing targeted an unknown id.
    assert_eq!(mock.count(GET, "/api/cliente/"), 0);
    assert_eq!(mock.count(GET, "/api/clientes"), 1);
}

#[tokio::test]
#[ntest::timeout(5_000)]
async fn created_client_can_be_fetched() {
    let mock = MockService::new();
    let api = start(&mock).await;

    let id = api
        .crear_cliente(&ClientePayload {
            correo: "cliente_ab12cd34ef@ejemplo.com".to_string(),
            nombre: "Nombre Cliente".to_string(),
            telefono: "1234567890".to_string(),
        })
        .await
        .unwrap();
    assert!(!id.is_empty());

    let res = api.detalle_cliente(&id).await.unwrap();
    assert_eq!(res.status.as_u16(), 200);
    assert!(res.body.contains("cliente_ab12cd34ef@ejemplo.com"));
}

#[tokio::test]
#[ntest::timeout(5_000)]
async fn duplicate_email_is_a_status_error() {
    let mock = MockService::new();
    let api = start(&mock).await;
    let payload = ClientePayload {
        correo: "cliente_ab12cd34ef@ejemplo.com".to_string(),
        nombre: "Nombre Cliente".to_string(),
        telefono: "1234567890".to_string(),
    };

    api.crear_cliente(&payload).await.unwrap();
    let err = api.crear_cliente(&payload).await.unwrap_err();

    assert!(matches!(err, ApiError::Status { .. }));
    assert_eq!(err.status().map(|s| s.as_u16()), Some(400));
}

/* Equipo */

#[tokio::test]
#[ntest::timeout(5_000)]
async fn equipo_steps_cycle_in_order() {
    let mock = MockService::new();
    let mut user = EquipoUser::with_rng(start(&mock).await, seeded(7));

    for (index, step) in Step::ALL.iter().enumerate() {
        assert_eq!(user.step(), *step);
        assert_eq!(user.step().index(), index);
        user.run(EquipoTask::EjecutarTareas).await;

        if *step == Step::CrearClientes {
            assert_eq!(user.clientes().len(), 4);
            assert!(user.equipos().is_empty());
        }
        if *step == Step::AsignarEquipos {
            assert_eq!(user.equipos().len(), user.clientes().len());
        }
    }

    assert_eq!(user.step(), Step::CrearClientes);

    // Every client create precedes the first equipment create.
    let requests = mock.requests();
    let first_equipo = requests
        .iter()
        .position(|r| r.path == "/api/equipo")
        .unwrap();
    let last_cliente = requests
        .iter()
        .rposition(|r| r.path == "/api/cliente")
        .unwrap();
    assert!(last_cliente < first_equipo);
}

#[tokio::test]
#[ntest::timeout(10_000)]
async fn equipo_only_deletes_cached_ids() {
    let mock = MockService::new();
    let mut user = EquipoUser::with_rng(start(&mock).await, seeded(8));

    for _ in 0..Step::ALL.len() * 3 {
        user.run(EquipoTask::EjecutarTareas).await;
    }

    let deleted: Vec<String> = mock
        .requests()
        .into_iter()
        .filter(|r| r.method == Method::DELETE)
        .map(|r| r.path)
        .collect();
    assert_eq!(deleted.len(), 3);
    assert_eq!(
        deleted.iter().collect::<HashSet<_>>().len(),
        deleted.len(),
        "an equipment id was deleted twice: {deleted:?}"
    );

    // Every delete succeeded, and the cache mirrors what the API still holds.
    let cached: HashSet<EntityId> = user.equipos().iter().cloned().collect();
    let remaining: HashSet<EntityId> = numbers(mock.equipo_ids()).into_iter().collect();
    assert_eq!(cached, remaining);
}

#[traced_test]
#[tokio::test]
#[ntest::timeout(5_000)]
async fn equipo_phases_skip_on_empty_caches() {
    let mock = MockService::new();
    mock.set_faults(Faults {
        omit_created_id: true,
        ..Faults::default()
    });
    let mut user = EquipoUser::with_rng(start(&mock).await, seeded(9));

    for _ in 0..Step::ALL.len() {
        user.run(EquipoTask::EjecutarTareas).await;
    }

    assert_eq!(user.step(), Step::CrearClientes);
    assert!(user.clientes().is_empty());
    assert_eq!(mock.count(GET, "/api/equipo"), 0);
    assert_eq!(mock.requests().len(), 4);
    assert!(logs_contain("No clients generated to assign equipment to"));
    assert!(logs_contain("No equipment registered to update"));
    assert!(logs_contain("No equipment registered to fetch details for"));
    assert!(logs_contain("No equipment registered to delete"));
}

/* Mantenimiento */

#[tokio::test]
#[ntest::timeout(5_000)]
async fn mantenimiento_start_loads_ids() {
    let mock = MockService::new().with_mantenimientos([(1, 10), (2, 10), (3, 11), (4, 10), (5, 12)]);
    let mut user = MantenimientoUser::with_rng(start(&mock).await, seeded(10));

    user.on_start().await;

    let mantenimientos: Vec<EntityId> = user.mantenimientos().iter().cloned().collect();
    let equipos: Vec<EntityId> = user.equipos().iter().cloned().collect();
    assert_eq!(mantenimientos, numbers([1, 2, 3, 4, 5]));
    assert_eq!(equipos, numbers([10, 11, 12]));
}

#[traced_test]
#[tokio::test]
#[ntest::timeout(5_000)]
async fn mantenimiento_start_keeps_usable_records() {
    let mock = MockService::new().with_raw_mantenimientos([
        json!({"id_unico": 1, "id_equipo": "LAPAB12CD"}),
        json!({"id_unico": 2, "id_equipo": null}),
        json!({"id_unico": 3, "id_equipo": "LAPZZ99YY"}),
        json!({"id_unico": null, "id_equipo": "LAPAB12CD"}),
        json!("not a record"),
    ]);
    let mut user = MantenimientoUser::with_rng(start(&mock).await, seeded(13));

    user.on_start().await;

    let mantenimientos: Vec<EntityId> = user.mantenimientos().iter().cloned().collect();
    let equipos: Vec<EntityId> = user.equipos().iter().cloned().collect();
    assert_eq!(mantenimientos, numbers([1, 2, 3]));
    assert_eq!(
        equipos,
        [EntityId::from("LAPAB12CD"), EntityId::from("LAPZZ99YY")]
    );
    assert!(logs_contain("Skipped unusable identifiers in 3 maintenance records"));

    user.run(MantenimientoTask::PorEquipo).await;
    assert_eq!(mock.count(GET, "/api/mantenimiento/equipo/LAP"), 1);
    assert!(logs_contain("Fetched maintenance of equipment LAP"));
}

#[traced_test]
#[tokio::test]
#[ntest::timeout(5_000)]
async fn mantenimiento_tasks_hit_their_endpoints() {
    let mock = MockService::new().with_mantenimientos([(1, 10), (2, 11)]);
    let mut user = MantenimientoUser::with_rng(start(&mock).await, seeded(11));

    user.on_start().await;
    user.run(MantenimientoTask::PorId).await;
    user.run(MantenimientoTask::PorEquipo).await;
    user.run(MantenimientoTask::Todos).await;

    assert_eq!(mock.count(GET, "/api/mantenimiento/equipo/"), 1);
    assert_eq!(mock.requests().len(), 4);
    assert!(!logs_contain("failed"));
    assert!(logs_contain("Listed 2 maintenance records"));
}

#[traced_test]
#[tokio::test]
#[ntest::timeout(5_000)]
async fn mantenimiento_load_failure_leaves_caches_empty() {
    let mock = MockService::new().with_mantenimientos([(1, 10)]);
    mock.set_faults(Faults {
        fail_mantenimiento_list: true,
        ..Faults::default()
    });
    let mut user = MantenimientoUser::with_rng(start(&mock).await, seeded(12));

    user.on_start().await;
    user.run(MantenimientoTask::PorId).await;
    user.run(MantenimientoTask::PorEquipo).await;

    assert!(user.mantenimientos().is_empty());
    assert!(user.equipos().is_empty());
    assert_eq!(mock.requests().len(), 1);
    assert!(logs_contain("Loading maintenance records failed: status 500"));
    assert!(logs_contain("No maintenance records available to fetch"));
    assert!(logs_contain("No equipment available to fetch maintenance for"));
}

/* Admin */

#[traced_test]
#[tokio::test]
#[ntest::timeout(5_000)]
async fn admin_tasks_succeed_with_default_account() {
    let mock = MockService::new();
    let mut user = AdminUser::new(start(&mock).await, AdminConfig::default());

    user.run(AdminTask::Login).await;
    user.run(AdminTask::Actualizar).await;
    user.run(AdminTask::RecuperarPassword).await;

    assert_eq!(mock.count(Method::PUT, "/api/admin/1"), 1);
    assert!(logs_contain("Admin login succeeded"));
    assert!(logs_contain("Admin 1 updated"));
    assert!(logs_contain("Password recovery requested"));
}

#[traced_test]
#[tokio::test]
#[ntest::timeout(5_000)]
async fn admin_failures_are_logged_not_raised() {
    let mock = MockService::new();
    let admin = AdminConfig {
        id: "99".to_string(),
        password: "otra_password".to_string(),
        ..AdminConfig::default()
    };
    let mut user = AdminUser::new(start(&mock).await, admin);

    user.run(AdminTask::Login).await;
    user.run(AdminTask::Actualizar).await;

    assert!(logs_contain("Admin login failed: status 401"));
    assert!(logs_contain("Admin 99 update failed: status 404"));
}

#[tokio::test]
async fn calls_outside_a_scenario_still_go_out() {
    let mock = MockService::new();
    let api = start(&mock).await;

    tokio::time::timeout(Duration::from_secs(5), api.listar_clientes())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(mock.count(GET, "/api/clientes"), 1);
}
