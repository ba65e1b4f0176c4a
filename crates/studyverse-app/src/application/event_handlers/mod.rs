mod participant_directory_handler;

pub use participant_directory_handler::ParticipantDirectoryHandler;
