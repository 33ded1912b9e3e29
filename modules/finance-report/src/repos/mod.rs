pub mod ledger_repo;
pub mod month_data_repo;
