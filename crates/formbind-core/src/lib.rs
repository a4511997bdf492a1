#![deny(unsafe_code)]
#![doc = "formbind-core: 将多值字符串映射（URL 查询参数、表单字段、重复的命令行参数）解码为静态结构体。"]
#![doc = ""]
#![doc = "== 解码模型 =="]
#![doc = "调用方提供 [`ValueMap`]（键 → 有序字符串序列）与实现 [`Record`] 的目标结构体；引擎按字段声明顺序逐个解析元数据，"]
#![doc = "并在“自定义文本解码能力”“嵌套记录递归”“序列逐元素解码”“基础类型转换”之间分派。"]
#![doc = ""]
#![doc = "== 失败语义 =="]
#![doc = "引擎为 fail-fast：首个字段错误即终止整次调用，之前已写入的字段保持修改状态，不做回滚。"]

// 派生宏生成的代码固定引用 `::formbind_core`，crate 内部测试同样需要该路径可达。
extern crate self as formbind_core;

pub mod capability;
pub mod context;
pub mod decode;
pub mod engine;
pub mod erased;
pub mod error;
pub mod field;
pub mod options;
pub mod primitive;
pub mod schema;
pub mod value_map;

pub use formbind_macros::Record;

pub use capability::TextDecode;
pub use context::{DecodeContext, DecodeFrameGuard};
pub use decode::{Decoder, decode, decode_new, decode_with, parse_str};
pub use engine::{Element, Field, Record};
pub use erased::{ErasedDestination, ErasedRecord, decode_erased, decode_erased_with};
pub use error::{BoxError, ContractError, ConversionError, DecodeError, ElementError, codes};
pub use field::FieldSpec;
pub use options::DecodeOptions;
pub use primitive::{Kind, Primitive, PrimitiveValue, convert};
pub use value_map::ValueMap;
