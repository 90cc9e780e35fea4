pub mod transfer_config;
