use core::num::NonZeroU16;

use formbind_core::schema::{field_specs, keys, unknown_keys};
use formbind_core::{
    ContractError, DecodeError, DecodeOptions, Decoder, ErasedDestination, Record, ValueMap,
    codes, decode_erased, decode_erased_with, decode_new,
};

#[derive(Debug, Default, PartialEq, Record)]
pub struct Leaf {
    #[formbind(key = "leaf")]
    pub leaf: String,
}

#[derive(Debug, Default, PartialEq, Record)]
pub struct Middle {
    pub leaf: Leaf,
    #[formbind(key = "middle")]
    pub middle: u8,
}

#[derive(Debug, Default, PartialEq, Record)]
pub struct Top {
    #[formbind(key = "top", required)]
    pub top: bool,
    pub middle: Middle,
    #[formbind(key = "leaf")]
    pub shadow: String,
    pub unkeyed: i32,
}

fn depth(limit: u16) -> DecodeOptions {
    DecodeOptions::new().with_max_depth(NonZeroU16::new(limit).expect("测试使用非零层级"))
}

#[test]
fn depth_limit_counts_top_level_record() {
    let values = ValueMap::from([("top", ["1"]), ("middle", ["2"]), ("leaf", ["x"])]);

    let decoded: Top = Decoder::new(depth(3)).decode_new(&values).unwrap();
    assert!(decoded.top);
    assert_eq!(decoded.middle.middle, 2);
    assert_eq!(decoded.middle.leaf.leaf, "x");
    assert_eq!(decoded.shadow, "x", "同一个键可被多个字段消费");

    let err = Decoder::new(depth(2)).decode_new::<Top>(&values).unwrap_err();
    assert!(matches!(err, DecodeError::DepthExceeded { limit } if limit.get() == 2));
    assert_eq!(err.code(), codes::LIMIT_DEPTH_EXCEEDED);
    assert_eq!(err.key(), None);
}

#[test]
fn flat_record_fits_depth_one() {
    let decoder = Decoder::new(depth(1));
    let leaf: Leaf = decoder
        .decode_new(&ValueMap::from([("leaf", ["ok"])]))
        .unwrap();
    assert_eq!(leaf.leaf, "ok");
    assert!(decoder.decode_new::<Middle>(&ValueMap::new()).is_err());
}

/// 生成一条逐层包裹的记录链：`$outer { inner: $inner }`。
macro_rules! record_chain {
    ($inner:ident) => {};
    ($inner:ident, $outer:ident $(, $rest:ident)*) => {
        #[derive(Debug, Default, Record)]
        pub struct $outer {
            pub inner: $inner,
        }
        record_chain!($outer $(, $rest)*);
    };
}

#[derive(Debug, Default, Record)]
pub struct L0 {
    #[formbind(key = "leaf")]
    pub leaf: u8,
}

record_chain!(
    L0, L1, L2, L3, L4, L5, L6, L7, L8, L9, L10, L11, L12, L13, L14, L15, L16, L17, L18, L19,
    L20, L21, L22, L23, L24, L25, L26, L27, L28, L29, L30, L31, L32, L33, L34, L35, L36, L37,
    L38, L39, L40
);

#[test]
fn deep_nesting_decodes_with_default_options() {
    assert_eq!(DecodeOptions::default().max_depth, None);

    let decoded: L40 =
        decode_new(&ValueMap::from([("leaf", ["7"])])).expect("默认选项不限制层级");

    assert!(format!("{decoded:?}").contains("L0 { leaf: 7 }"));
    assert_eq!(keys::<L40>(), vec!["leaf"]);
}

#[test]
fn unbounded_options_accept_nesting() {
    let decoder = Decoder::new(DecodeOptions::unbounded());
    assert_eq!(decoder.options().max_depth, None);
    let values = ValueMap::from([("top", ["true"])]);
    assert!(decoder.decode_new::<Top>(&values).is_ok());
}

#[test]
fn erased_record_destination_decodes() {
    let mut top = Top::default();
    let values = ValueMap::from([("top", ["T"]), ("middle", ["9"])]);

    decode_erased(&mut top, &values).unwrap();

    assert!(top.top);
    assert_eq!(top.middle.middle, 9);
}

#[test]
fn erased_scalar_destination_is_not_a_record() {
    let values = ValueMap::from([("top", ["1"])]);

    let mut scalar = 5u32;
    let err = decode_erased(&mut scalar, &values).unwrap_err();
    assert!(err.is_contract());
    assert_eq!(err.code(), codes::CONTRACT_NOT_A_RECORD);
    assert!(matches!(
        err,
        DecodeError::Contract(ContractError::NotARecord { type_name: "u32" })
    ));
    assert_eq!(scalar, 5);

    let mut list: Vec<String> = Vec::new();
    let err = decode_erased_with(&mut list, &values, &DecodeOptions::unbounded()).unwrap_err();
    assert_eq!(err.code(), codes::CONTRACT_NOT_A_RECORD);
}

#[test]
fn erased_destinations_mix_in_one_registry() {
    let mut leaf = Leaf::default();
    let mut flag = false;
    let mut targets: Vec<&mut dyn ErasedDestination> =
        vec![&mut leaf as &mut dyn ErasedDestination, &mut flag];
    let values = ValueMap::from([("leaf", ["v"])]);

    let outcomes: Vec<bool> = targets
        .iter_mut()
        .map(|dst| decode_erased(&mut **dst, &values).is_ok())
        .collect();

    assert_eq!(outcomes, vec![true, false]);
    assert_eq!(leaf.leaf, "v");
}

#[test]
fn schema_flattens_nested_records() {
    assert_eq!(keys::<Top>(), vec!["top", "leaf", "middle"]);

    let names: Vec<_> = field_specs::<Top>()
        .into_iter()
        .map(|spec| spec.name())
        .collect();
    assert_eq!(names, vec!["top", "leaf", "middle", "shadow", "unkeyed"]);

    assert_eq!(<Top as Record>::fields().len(), 4, "`fields` 只返回本层字段");
}

#[test]
fn schema_reports_unknown_keys() {
    let values = ValueMap::from_pairs([
        ("top", "1"),
        ("zeta", "z"),
        ("leaf", "l"),
        ("alpha", "a"),
    ]);
    assert_eq!(unknown_keys::<Top>(&values), vec!["alpha", "zeta"]);
    assert!(unknown_keys::<Top>(&ValueMap::new()).is_empty());
}
