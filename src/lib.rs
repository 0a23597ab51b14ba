pub mod api_connection;
pub mod cli;
pub mod recipe_annotator;
pub mod recipe_decoder;
pub mod recipe_loader;
pub mod recipe_record;
pub mod recipe_search;
pub mod recipe_store;
