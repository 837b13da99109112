/// Offline answer dataset lookups.
pub mod offline;
/// PetScan category-membership client.
pub mod petscan;
