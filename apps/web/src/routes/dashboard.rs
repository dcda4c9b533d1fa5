//! Signed-in landing page. Figures are placeholders until the app has a data
//! backend of its own.

use crate::components::layout::AppShell;
use crate::components::use_toasts;
use crate::features::auth::{RouteGuard, use_auth};
use auth_state::notice::ToastSpec;
use leptos::prelude::*;

struct Metric {
    title: &'static str,
    value: &'static str,
    change: &'static str,
    trend: &'static str,
    accent: &'static str,
}

static METRICS: [Metric; 4] = [
    Metric {
        title: "Total Users",
        value: "1,234",
        change: "+12%",
        trend: "from last month",
        accent: "bg-blue-500",
    },
    Metric {
        title: "Revenue",
        value: "$45,678",
        change: "+8%",
        trend: "from last month",
        accent: "bg-green-500",
    },
    Metric {
        title: "Active Projects",
        value: "24",
        change: "3",
        trend: "new this week",
        accent: "bg-purple-500",
    },
    Metric {
        title: "Completion Rate",
        value: "87%",
        change: "+5%",
        trend: "from last month",
        accent: "bg-orange-500",
    },
];

static QUICK_ACTIONS: [(&str, &str, &str); 3] = [
    ("Create New Project", "Start a new project", "bg-blue-50 hover:bg-blue-100"),
    ("Generate Report", "Create analytics report", "bg-green-50 hover:bg-green-100"),
    ("Invite Team Member", "Add new team member", "bg-purple-50 hover:bg-purple-100"),
];

static ACTIVITY: [(&str, &str, &str); 3] = [
    (
        "New project created",
        "Website redesign project was created",
        "2 hours ago",
    ),
    (
        "Task completed",
        "Mobile app wireframes task was completed",
        "4 hours ago",
    ),
    (
        "Team member joined",
        "A new designer joined the workspace",
        "1 day ago",
    ),
];

#[component]
pub fn DashboardPage() -> impl IntoView {
    view! {
        <AppShell>
            <RouteGuard>
                <Dashboard />
            </RouteGuard>
        </AppShell>
    }
}

#[component]
fn Dashboard() -> impl IntoView {
    let auth = use_auth();
    let toasts = use_toasts();
    let greeting = move || {
        auth.user
            .get()
            .map(|user| format!("Welcome back, {}!", user.display_name()))
            .unwrap_or_else(|| "Welcome back!".to_string())
    };

    view! {
        <div class="max-w-7xl mx-auto px-4 py-8 sm:px-6 lg:px-8">
            <div class="mb-8">
                <h1 class="text-3xl font-bold text-gray-900">"Dashboard"</h1>
                <p class="mt-2 text-gray-600">
                    {greeting} " Here's what's happening with your account."
                </p>
            </div>

            <div class="grid grid-cols-1 gap-6 mb-8 md:grid-cols-2 lg:grid-cols-4">
                {METRICS
                    .iter()
                    .map(|metric| {
                        view! {
                            <div class="overflow-hidden rounded-lg bg-white shadow">
                                <div class="flex items-center p-5">
                                    <div class=format!("h-8 w-8 shrink-0 rounded-md {}", metric.accent)></div>
                                    <dl class="ml-5 flex-1">
                                        <dt class="truncate text-sm font-medium text-gray-500">{metric.title}</dt>
                                        <dd class="text-lg font-medium text-gray-900">{metric.value}</dd>
                                    </dl>
                                </div>
                                <div class="bg-gray-50 px-5 py-3 text-sm">
                                    <span class="font-medium text-green-600">{metric.change}</span>
                                    <span class="text-gray-500">" " {metric.trend}</span>
                                </div>
                            </div>
                        }
                    })
                    .collect_view()}
            </div>

            <div class="grid grid-cols-1 gap-8 lg:grid-cols-3">
                <section class="rounded-lg bg-white p-6 shadow lg:col-span-1">
                    <h2 class="mb-4 text-lg font-semibold text-gray-900">"Quick Actions"</h2>
                    <div class="space-y-3">
                        {QUICK_ACTIONS
                            .iter()
                            .map(|&(title, description, class)| {
                                view! {
                                    <button
                                        type="button"
                                        class=format!("w-full rounded-md px-4 py-3 text-left transition-colors {class}")
                                        on:click=move |_| {
                                            toasts.push(ToastSpec::info(title, "This action is not wired up yet."));
                                        }
                                    >
                                        <p class="font-medium text-gray-900">{title}</p>
                                        <p class="text-sm text-gray-500">{description}</p>
                                    </button>
                                }
                            })
                            .collect_view()}
                    </div>
                </section>

                <section class="rounded-lg bg-white p-6 shadow lg:col-span-2">
                    <h2 class="text-lg font-semibold text-gray-900">"Recent Activity"</h2>
                    <p class="mb-4 text-sm text-gray-500">"Latest updates and changes in your workspace"</p>
                    <ul class="space-y-4">
                        {ACTIVITY
                            .iter()
                            .map(|&(title, description, time)| {
                                view! {
                                    <li class="flex items-start gap-3">
                                        <div class="mt-1 h-2 w-2 rounded-full bg-blue-500"></div>
                                        <div>
                                            <p class="text-sm font-medium text-gray-900">{title}</p>
                                            <p class="text-sm text-gray-500">{description}</p>
                                            <p class="mt-1 text-xs text-gray-400">{time}</p>
                                        </div>
                                    </li>
                                }
                            })
                            .collect_view()}
                    </ul>
                </section>
            </div>
        </div>
    }
}
