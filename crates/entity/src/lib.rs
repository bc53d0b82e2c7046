pub mod confirmation_code;
pub mod document;
pub mod document_return;
pub mod document_type;
pub mod employee;
pub mod stage_chain;
pub mod stage_config;
