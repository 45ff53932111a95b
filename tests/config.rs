use config::Config;
use forest_client_match::models::config::ServerConfig;

#[test]
fn test_default_config_loads_the_match_client_section() {
    let settings = Config::builder()
        .add_source(config::File::with_name("config/default"))
        .build()
        .unwrap();
    let server_config: ServerConfig = settings.try_deserialize().unwrap();

    assert_eq!(server_config.port, 8080);
    let match_client = server_config.match_client.unwrap();
    assert_eq!(match_client.base_url, "http://127.0.0.1:8080");
    assert_eq!(match_client.timeout_secs, 10);
    assert_eq!(match_client.max_retries, 2);
    assert_eq!(match_client.retry_backoff_ms, 250);
}
