use formbind_core::{Record, ValueMap, decode_new};
use tracing_test::traced_test;

#[derive(Debug, Default, Record)]
pub struct Credentials {
    #[formbind(key = "user", required)]
    pub user: String,
    #[formbind(key = "retries", default = "3")]
    pub retries: u8,
}

/// 失败路径以 `debug` 级别输出错误码与键，错误值本身仍原样返回给调用方。
#[test]
#[traced_test]
fn failure_is_logged_with_code_and_key() {
    let err = decode_new::<Credentials>(&ValueMap::new()).unwrap_err();

    assert_eq!(err.key(), Some("user"));
    assert!(logs_contain("decode failed"));
    assert!(logs_contain("field.missing"));
    assert!(logs_contain("formbind.decode"));
}

#[test]
#[traced_test]
fn default_substitution_is_traced() {
    let decoded: Credentials = decode_new(&ValueMap::from([("user", ["ops"])])).unwrap();

    assert_eq!(decoded.retries, 3);
    assert!(logs_contain("applying default value"));
    assert!(!logs_contain("decode failed"));
}
