use mock_service::MockService;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use taller_carga::ApiClient;
use url::Url;

/// Serves `mock` on an ephemeral port and returns a client pointed at it.
#[allow(unused)]
pub async fn start(mock: &MockService) -> ApiClient {
    let addr = mock.spawn().await.expect("mock service failed to start");
    ApiClient::new(Url::parse(&format!("http://{addr}")).unwrap())
}

#[allow(unused)]
pub fn seeded(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}
