//! 基础转换与序列解码的性质验证
//!
//! # 教案级注释概览
//!
//! - **核心目标 (Why)**：基础转换表是解码引擎唯一的“叶子”语义，任何宽度或符号处理的偏差都会直接暴露给调用方。
//!   以 Proptest 覆盖全值域，验证“格式化后再转换”得到原值，且规范化输出与 Rust 的 `Display` 一致。
//! - **设计手法 (How)**：
//!   1. 对每个整数宽度生成任意值，格式化（可附加前导零）后转换，断言规范化结果；
//!   2. 对序列字段生成任意长度的整数列表，断言解码保持输入顺序；
//!   3. 对无符号目标生成任意负数文本，断言报告 `Negative` 而非语法错误。
//!
//! # 合同与边界 (What)
//!
//! - 浮点数只覆盖有限值，`NaN` 不满足相等性，单独由单元测试覆盖；
//! - 性质不依赖任何全局状态，可并行执行。

use formbind_core::{
    ConversionError, ElementError, Kind, PrimitiveValue, Record, ValueMap, convert, decode_new,
    parse_str,
};
use proptest::prelude::*;

#[derive(Debug, Default, Record)]
pub struct Numbers {
    #[formbind(key = "xs")]
    pub xs: Vec<i32>,
    #[formbind(key = "flag")]
    pub flag: bool,
}

proptest! {
    #[test]
    fn prop_unsigned_round_trips_with_leading_zeros(value in any::<u64>(), zeros in 0usize..4) {
        let text = format!("{}{value}", "0".repeat(zeros));
        let converted = convert(&text, Kind::U64).expect("范围内的字面量必须可转换");
        prop_assert_eq!(&converted, &PrimitiveValue::U64(value));
        prop_assert_eq!(converted.to_string(), value.to_string());
    }

    #[test]
    fn prop_signed_round_trips(value in any::<i16>()) {
        prop_assert_eq!(parse_str::<i16>(&value.to_string()).unwrap(), value);
        prop_assert_eq!(
            convert(&value.to_string(), Kind::I16).unwrap().to_string(),
            value.to_string()
        );
    }

    #[test]
    fn prop_wider_values_overflow_narrow_targets(value in (i64::from(i8::MAX) + 1)..i64::MAX) {
        let err = convert(&value.to_string(), Kind::I8).unwrap_err();
        prop_assert_eq!(err, ConversionError::OutOfRange { kind: Kind::I8 });
    }

    #[test]
    fn prop_unsigned_rejects_negative_literals(value in 1u32..=u32::MAX) {
        let err = parse_str::<u32>(&format!("-{value}")).unwrap_err();
        let negative = matches!(
            err,
            ElementError::Conversion(ConversionError::Negative { kind: Kind::U32 })
        );
        prop_assert!(negative, "expected a negative-literal error, got {:?}", err);
    }

    #[test]
    fn prop_finite_floats_round_trip(value in proptest::num::f64::NORMAL | proptest::num::f64::ZERO) {
        prop_assert_eq!(parse_str::<f64>(&value.to_string()).unwrap(), value);
    }

    #[test]
    fn prop_sequence_preserves_order(xs in proptest::collection::vec(any::<i32>(), 0..16)) {
        let texts: Vec<String> = xs.iter().map(ToString::to_string).collect();
        let values = ValueMap::from([("xs", texts)]);
        let decoded: Numbers = decode_new(&values).unwrap();
        prop_assert_eq!(decoded.xs, xs);
        prop_assert!(!decoded.flag);
    }
}
