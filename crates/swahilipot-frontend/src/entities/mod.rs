pub mod session_entity;
pub mod settings_entity;

/// Stores shared by every player surface.
#[derive(Debug, Clone, Default)]
pub struct DataEntities {
    pub settings: settings_entity::SettingsEntity,
    pub session: session_entity::SessionEntity,
}
