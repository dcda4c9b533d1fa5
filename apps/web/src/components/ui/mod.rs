mod alert;
mod button;
mod field;
mod spinner;
mod toast;

pub(crate) use alert::{Alert, AlertKind};
pub(crate) use button::Button;
pub(crate) use field::{TextField, Toggle};
pub(crate) use spinner::{FullPageSpinner, Spinner};
pub(crate) use toast::{ToastProvider, Toasts, use_toasts};
