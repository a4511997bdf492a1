//! 宿主从自身配置文件加载 `DecodeOptions` 的集成验证（需启用 `serde` 特性）。

use core::num::NonZeroU16;

use formbind_core::DecodeOptions;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct HostConfig {
    #[serde(default)]
    decode: DecodeOptions,
}

#[test]
fn options_load_from_toml_section() {
    let config: HostConfig = toml::from_str(
        r#"
        [decode]
        max_depth = 4
        "#,
    )
    .expect("合法配置应能解析");

    assert_eq!(config.decode.max_depth, NonZeroU16::new(4));
}

#[test]
fn missing_section_falls_back_to_default() {
    let config: HostConfig = toml::from_str("").unwrap();
    assert_eq!(config.decode, DecodeOptions::default());
    assert_eq!(config.decode.max_depth, None, "默认不限制记录层级");
}

#[test]
fn zero_depth_and_unknown_fields_are_rejected() {
    assert!(toml::from_str::<HostConfig>("[decode]\nmax_depth = 0").is_err());
    assert!(toml::from_str::<HostConfig>("[decode]\nmax_width = 3").is_err());
}
