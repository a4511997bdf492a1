//! 类型擦除的解码入口。
//!
//! 静态入口 [`decode`](crate::decode) 在编译期要求目标实现 [`Record`]；当目标只能以
//! `dyn` 形式传递（例如插件注册表中按名称查找的表单目标）时，使用 [`decode_erased`]，
//! 此时“目标不是记录”在运行期以 [`ContractError::NotARecord`] 报告。

use core::any::type_name;

use crate::decode::decode_with;
use crate::engine::Record;
use crate::error::{ContractError, DecodeError};
use crate::options::DecodeOptions;
use crate::value_map::ValueMap;

/// 对象安全的记录视图。
pub trait ErasedRecord {
    fn type_name(&self) -> &'static str;

    fn decode_erased(
        &mut self,
        values: &ValueMap,
        options: &DecodeOptions,
    ) -> Result<(), DecodeError>;
}

impl<R: Record> ErasedRecord for R {
    fn type_name(&self) -> &'static str {
        type_name::<R>()
    }

    fn decode_erased(
        &mut self,
        values: &ValueMap,
        options: &DecodeOptions,
    ) -> Result<(), DecodeError> {
        decode_with(self, values, options)
    }
}

/// 可作为类型擦除解码目标的值；只有记录类型提供 [`ErasedRecord`] 视图。
pub trait ErasedDestination {
    fn type_name(&self) -> &'static str;

    fn as_record(&mut self) -> Option<&mut dyn ErasedRecord>;
}

impl<R: Record> ErasedDestination for R {
    fn type_name(&self) -> &'static str {
        type_name::<R>()
    }

    fn as_record(&mut self) -> Option<&mut dyn ErasedRecord> {
        Some(self)
    }
}

macro_rules! scalar_destination {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ErasedDestination for $ty {
                fn type_name(&self) -> &'static str {
                    type_name::<$ty>()
                }

                fn as_record(&mut self) -> Option<&mut dyn ErasedRecord> {
                    None
                }
            }
        )*
    };
}

scalar_destination!(
    String, bool, u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, f32, f64,
);

impl<E> ErasedDestination for Vec<E> {
    fn type_name(&self) -> &'static str {
        type_name::<Self>()
    }

    fn as_record(&mut self) -> Option<&mut dyn ErasedRecord> {
        None
    }
}

/// 以默认选项解码类型擦除的目标。
pub fn decode_erased(
    dst: &mut dyn ErasedDestination,
    values: &ValueMap,
) -> Result<(), DecodeError> {
    decode_erased_with(dst, values, &DecodeOptions::default())
}

/// 以指定选项解码类型擦除的目标；目标不是记录时返回契约错误且不读取 `values`。
pub fn decode_erased_with(
    dst: &mut dyn ErasedDestination,
    values: &ValueMap,
    options: &DecodeOptions,
) -> Result<(), DecodeError> {
    let type_name = dst.type_name();
    match dst.as_record() {
        Some(record) => record.decode_erased(values, options),
        None => {
            tracing::debug!(destination = type_name, "destination is not a record");
            Err(ContractError::NotARecord { type_name }.into())
        }
    }
}
