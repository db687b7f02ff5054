//! Localstore storage subsystem.

use rocksdb::{Cache, ColumnFamilyDescriptor};

use super::schema::{
    Fields, Gc, Pin, PostageChunks, PostageIndex, Pull, Push, RetrievalAccess, RetrievalData,
    COLUMN_FAMILIES,
};
use crate::rocksdb::{BlockCacheConfig, ColumnFamilyConfig, StorageSubsystem};

/// Column families of a localstore: one per index plus the fields store.
pub struct Subsystem;

impl Subsystem {
    fn descriptor<CF: ColumnFamilyConfig<BlockCacheConfig>>(
        cache: &Cache,
        config: &BlockCacheConfig,
    ) -> ColumnFamilyDescriptor {
        ColumnFamilyDescriptor::new(CF::CF_NAME, CF::cf_options(cache, config))
    }
}

impl StorageSubsystem for Subsystem {
    const NAME: &'static str = "localstore";
    const COLUMN_FAMILIES: &'static [&'static str] = COLUMN_FAMILIES;

    fn cf_descriptors(cache: &Cache, config: &BlockCacheConfig) -> Vec<ColumnFamilyDescriptor> {
        vec![
            Self::descriptor::<RetrievalData>(cache, config),
            Self::descriptor::<RetrievalAccess>(cache, config),
            Self::descriptor::<Pull>(cache, config),
            Self::descriptor::<Push>(cache, config),
            Self::descriptor::<Gc>(cache, config),
            Self::descriptor::<Pin>(cache, config),
            Self::descriptor::<PostageChunks>(cache, config),
            Self::descriptor::<PostageIndex>(cache, config),
            Self::descriptor::<Fields>(cache, config),
        ]
    }
}
