pub mod account;
pub mod agent;
pub mod goals;
pub mod patch;
pub mod vocab;

pub use account::{
    normalize_email, Account, AccountDraft, Address, AddressInput, AgentSummary, ContactKind,
    Notifications, NotificationsPatch, Phone, PhoneInput, Role, UserSummary, DEFAULT_COUNTRY,
};
pub use agent::{Achievement, AgentProfile, Contact, Office, OfficeAddress, Rating, SocialMedia};
pub use goals::{Goals, GoalsPatch};
pub use patch::{AccountPatch, AgentProfilePatch};
