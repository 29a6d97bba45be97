pub mod box_client;
