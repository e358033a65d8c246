use crate::utils::error::Result;

/// Byte storage addressed by relative path.
pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn data_dir(&self) -> &str;
    fn store_file(&self) -> &str;
    fn seed(&self) -> Option<u64>;
    fn max_attempts(&self) -> usize;
}
