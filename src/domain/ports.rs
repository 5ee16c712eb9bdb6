use crate::domain::model::{OperationSelection, SequenceParams};
use crate::utils::error::Result;

/// Destination for exported reports.
pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn sequence_params(&self) -> SequenceParams;
    fn operations(&self) -> OperationSelection;
    fn series_enabled(&self) -> bool;
    fn max_n(&self) -> u64;
    fn recursion_limit(&self) -> u64;
    fn export_formats(&self) -> &[String];
}
