pub mod reanalysis_client;
