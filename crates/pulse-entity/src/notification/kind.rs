//! Notification type enumeration.

use crate::text::text_enum;

text_enum! {
    /// The business event a notification was produced from.
    pub enum NotificationType {
        /// A new lead was captured.
        NewLead => "new_lead",
        /// A payment came in.
        PaymentReceived => "payment_received",
        /// An invoice went past due.
        InvoiceOverdue => "invoice_overdue",
        /// A call was missed.
        MissedCall => "missed_call",
        /// The daily digest.
        DailyBriefing => "daily_briefing",
        /// A system-level alert.
        SystemAlert => "system_alert",
        /// An assistant-generated insight.
        CoFounderInsight => "co_founder_insight",
    }
}
