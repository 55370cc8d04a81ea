pub mod error;
pub mod gateway;
pub mod worker;

pub use error::ApiError;
pub use gateway::{HttpGateway, TaskApi};
pub use worker::{ApiReply, ApiRequest, ApiWorker, Completion};
