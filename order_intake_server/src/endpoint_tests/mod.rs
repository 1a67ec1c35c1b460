mod automation;
mod helpers;
mod mocks;
mod voice_agent;
