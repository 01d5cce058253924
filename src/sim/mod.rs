pub mod heat_transfer;
pub mod pipeline;
