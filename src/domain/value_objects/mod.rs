pub mod chatbot_command;

pub use chatbot_command::ChatbotCommand;
