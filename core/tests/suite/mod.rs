use multiseek_backend_client::GatewayConfig;
use multiseek_backend_client::HttpGateway;
use std::sync::Arc;
use wiremock::MockServer;

mod feed_flow;
mod search_flow;

fn gateway(config: GatewayConfig) -> Arc<HttpGateway> {
    Arc::new(HttpGateway::new(config).expect("valid gateway config"))
}

fn gateway_for(server: &MockServer) -> Arc<HttpGateway> {
    gateway(GatewayConfig::with_base_url(server.uri()))
}
