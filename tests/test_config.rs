use std::collections::HashMap;
use std::io::Write;

use rawhttp::config::Config;

fn source(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn test_config_defaults() {
    let cfg = Config::from_source(source(&[])).unwrap();

    assert_eq!(cfg.listen_addr, "127.0.0.1:42069");
    assert_eq!(cfg.read_buffer_size, 1024);
}

#[test]
fn test_config_env_overrides() {
    let cfg = Config::from_source(source(&[("LISTEN", "0.0.0.0:3000"), ("READ_BUFFER_SIZE", "8")])).unwrap();

    assert_eq!(cfg.listen_addr, "0.0.0.0:3000");
    assert_eq!(cfg.read_buffer_size, 8);
}

#[test]
fn test_config_rejects_bad_buffer_size() {
    assert!(Config::from_source(source(&[("READ_BUFFER_SIZE", "lots")])).is_err());
    assert!(Config::from_source(source(&[("READ_BUFFER_SIZE", "0")])).is_err());
}

#[test]
fn test_config_from_yaml() {
    let cfg = Config::from_yaml("listen_addr: \"0.0.0.0:8080\"\nread_buffer_size: 4096\n").unwrap();
    assert_eq!(cfg.listen_addr, "0.0.0.0:8080");
    assert_eq!(cfg.read_buffer_size, 4096);

    let partial = Config::from_yaml("read_buffer_size: 16\n").unwrap();
    assert_eq!(partial.listen_addr, "127.0.0.1:42069");

    assert!(Config::from_yaml("read_buffer_size: 0\n").is_err());
}

#[test]
fn test_config_file_then_env() {
    let path = std::env::temp_dir().join(format!("rawhttp-config-{}.yaml", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "listen_addr: \"0.0.0.0:9000\"").unwrap();
    writeln!(file, "read_buffer_size: 64").unwrap();
    drop(file);

    let path_str = path.to_string_lossy().into_owned();
    let cfg = Config::from_source(source(&[("RAWHTTP_CONFIG", path_str.as_str()), ("LISTEN", "127.0.0.1:1")])).unwrap();

    assert_eq!(cfg.listen_addr, "127.0.0.1:1");
    assert_eq!(cfg.read_buffer_size, 64);

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_config_missing_file() {
    let result = Config::from_source(source(&[("RAWHTTP_CONFIG", "/nonexistent/rawhttp.yaml")]));
    assert!(result.is_err());
}

#[test]
fn test_config_clone() {
    let cfg1 = Config::default();
    let cfg2 = cfg1.clone();
    assert_eq!(cfg1, cfg2);
}
