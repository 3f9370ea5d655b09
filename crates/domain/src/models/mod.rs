//! Domain models for the field dispatch backend.

pub mod command;

pub use command::{
    AcknowledgeCommandRequest, Command, CommandListResponse, CommandStatus,
    DeleteCommandResponse, EnqueueCommandRequest, ListCommandsQuery,
};
