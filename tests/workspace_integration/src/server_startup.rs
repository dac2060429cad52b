//! Server startup integration tests.
//!
//! Tests that the MCP server can be instantiated from configuration and
//! provides correct server info.

#[cfg(test)]
mod tests {
    use picsum_mcp_common::{Config, Transport, TransportArgs};
    use picsum_mcp_image::PicsumServer;
    use rmcp::ServerHandler;

    #[test]
    fn test_server_startup_with_default_config() {
        let server = PicsumServer::new(Config::default()).expect("server should build");
        let info = server.get_info();

        let instructions = info
            .instructions
            .as_ref()
            .expect("instructions should be set")
            .to_lowercase();
        assert!(instructions.contains("image"), "Server instructions should mention 'image'");
        assert!(instructions.contains("picsum"), "Server instructions should mention 'picsum'");
    }

    #[test]
    fn test_server_capabilities() {
        let server = PicsumServer::new(Config::default()).expect("server should build");
        let info = server.get_info();

        assert!(info.capabilities.tools.is_some(), "tools capability should be enabled");
        assert!(info.capabilities.prompts.is_some(), "prompts capability should be enabled");
        assert!(info.capabilities.resources.is_none(), "no resources are exposed");
    }

    #[test]
    fn test_server_startup_with_custom_provider() {
        let config = Config::with_base_url("http://localhost:9000/");
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.api_url, "http://localhost:9000/v2");
        assert!(PicsumServer::new(config).is_ok());
    }

    #[test]
    fn test_default_transport_is_stdio() {
        let transport = TransportArgs::default().into_transport();
        assert_eq!(transport, Transport::Stdio);
        assert!(transport.bind_addr().is_none());
    }
}
