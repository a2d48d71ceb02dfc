pub mod etl;
pub mod normalize;
pub mod pipeline;
pub mod prize;
pub mod views;

pub use crate::domain::model::{Record, TransformResult};
pub use crate::domain::ports::{Pipeline, RecordSource, Storage};
pub use crate::domain::value::Fields;
pub use crate::utils::error::Result;
