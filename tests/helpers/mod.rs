#![allow(dead_code)]
pub mod mock_plugins;
pub mod mock_store;
pub mod test_metrics;

use mock_plugins::{RecordingConversationPlugin, RecordingEmailPlugin};
use report_dispatch::config::ReportsConfig;
use report_dispatch::core::{Incident, PluginInstance};
use report_dispatch::plugins::InMemoryPluginRegistry;
use report_dispatch::store::JsonIncidentStore;
use report_dispatch::test_fixtures::SAMPLE_PROJECT_ID;
use report_dispatch::ReportMessenger;
use std::sync::Arc;

pub type TestMessenger = ReportMessenger<JsonIncidentStore, InMemoryPluginRegistry>;

/// The pieces of a messenger a test wants to inspect after the call.
pub struct TestHarness {
    pub messenger: TestMessenger,
    pub store: Arc<JsonIncidentStore>,
    pub conversation: Arc<RecordingConversationPlugin>,
    pub email: Arc<RecordingEmailPlugin>,
}

/// Builds a messenger over `incidents`, enabling the requested plugins for
/// the sample project.
pub fn harness(
    incidents: Vec<Incident>,
    with_conversation: bool,
    with_email: bool,
    config: ReportsConfig,
) -> TestHarness {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let conversation = Arc::new(RecordingConversationPlugin::new());
    let email = Arc::new(RecordingEmailPlugin::new());

    let mut registry = InMemoryPluginRegistry::new();
    if with_conversation {
        registry.register(
            SAMPLE_PROJECT_ID,
            PluginInstance::Conversation(conversation.clone()),
        );
    }
    if with_email {
        registry.register(SAMPLE_PROJECT_ID, PluginInstance::Email(email.clone()));
    }

    let store = Arc::new(JsonIncidentStore::in_memory(incidents));
    let messenger = ReportMessenger::new(store.clone(), Arc::new(registry), config);

    TestHarness {
        messenger,
        store,
        conversation,
        email,
    }
}
