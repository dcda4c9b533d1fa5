//! Inline status banners. Messages are rendered as text and must never carry
//! tokens.

use leptos::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertKind {
    Error,
    Success,
    Info,
}

impl AlertKind {
    fn class(self) -> &'static str {
        match self {
            Self::Error => "rounded-md border border-red-200 bg-red-50 px-4 py-3 text-sm text-red-700",
            Self::Success => {
                "rounded-md border border-green-200 bg-green-50 px-4 py-3 text-sm text-green-700"
            }
            Self::Info => "rounded-md border border-blue-200 bg-blue-50 px-4 py-3 text-sm text-blue-700",
        }
    }

    /// Errors interrupt screen readers; everything else is announced politely.
    fn role(self) -> &'static str {
        match self {
            Self::Error => "alert",
            Self::Success | Self::Info => "status",
        }
    }
}

#[component]
pub fn Alert(kind: AlertKind, #[prop(into)] message: String) -> impl IntoView {
    view! {
        <div class=kind.class() role=kind.role()>
            {message}
        </div>
    }
}
