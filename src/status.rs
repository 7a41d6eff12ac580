//! Status–colour registry
//!
//! Export and import use two separate tables. Export always paints one
//! canonical colour per status; import accepts a wider set of colours,
//! including legacy fills that several older sheets used for the same status.

use serde::{Deserialize, Serialize};

/// Fill used for rows whose status is empty or unknown
pub const DEFAULT_FILL: &str = "FFFFFFFF";

/// The six store statuses, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Contracted,
    AwaitingReply,
    Rejected,
    ContactManager,
    ContractedPendingAccount,
    Meeting,
}

impl Status {
    pub const ALL: [Status; 6] = [
        Status::Contracted,
        Status::AwaitingReply,
        Status::Rejected,
        Status::ContactManager,
        Status::ContractedPendingAccount,
        Status::Meeting,
    ];

    /// Label stored in documents and shown to users
    pub fn label(self) -> &'static str {
        match self {
            Status::Contracted => "تم التعاقد",
            Status::AwaitingReply => "في انتظار الرد",
            Status::Rejected => "مرفوض",
            Status::ContactManager => "اتصال مع المسؤول",
            Status::ContractedPendingAccount => "تم التعاقد باقي تكملة الحساب",
            Status::Meeting => "اجتماع",
        }
    }

    /// Exact label match, no trimming or case folding
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }

    /// Canonical export fill (ARGB)
    pub fn color(self) -> &'static str {
        match self {
            Status::Contracted => "FF4CAF50",
            Status::AwaitingReply => "FFFFA500",
            Status::Rejected => "FFFF0000",
            Status::ContactManager => "FF2196F3",
            Status::ContractedPendingAccount => "FF9C27B0",
            Status::Meeting => "FF00BCD4",
        }
    }
}

/// Colours accepted on import. Not derived from `Status::color`.
const IMPORT_COLORS: [(&str, Status); 12] = [
    ("FFFFFF00", Status::AwaitingReply), // yellow
    ("FFFFA500", Status::AwaitingReply), // orange
    ("FF00FF00", Status::Contracted),
    ("FF4CAF50", Status::Contracted),
    ("FF0000FF", Status::ContactManager),
    ("FF2196F3", Status::ContactManager),
    ("FFFF0000", Status::Rejected),
    ("FFF44336", Status::Rejected),
    ("FFFF69B4", Status::Meeting), // pink
    ("FF00BCD4", Status::Meeting), // cyan
    ("FF9C27B0", Status::ContractedPendingAccount),
    ("FF800080", Status::ContractedPendingAccount),
];

/// Export colour for a status label, white when the label is not a status
pub fn color_for_status(status: &str) -> &'static str {
    Status::from_label(status)
        .map(Status::color)
        .unwrap_or(DEFAULT_FILL)
}

/// Status label for an ARGB fill code, empty when the colour is not registered
pub fn status_for_color(color: &str) -> &'static str {
    IMPORT_COLORS
        .iter()
        .find(|(code, _)| *code == color)
        .map(|(_, status)| status.label())
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_export_colors() {
        assert_eq!(color_for_status("تم التعاقد"), "FF4CAF50");
        assert_eq!(color_for_status("في انتظار الرد"), "FFFFA500");
        assert_eq!(color_for_status("مرفوض"), "FFFF0000");
        assert_eq!(color_for_status("اتصال مع المسؤول"), "FF2196F3");
        assert_eq!(color_for_status("تم التعاقد باقي تكملة الحساب"), "FF9C27B0");
        assert_eq!(color_for_status("اجتماع"), "FF00BCD4");
    }

    #[test]
    fn test_unknown_status_is_white() {
        assert_eq!(color_for_status(""), DEFAULT_FILL);
        assert_eq!(color_for_status("pending"), DEFAULT_FILL);
        // no trimming
        assert_eq!(color_for_status(" مرفوض"), DEFAULT_FILL);
    }

    #[test]
    fn test_import_color_table() {
        let expected = [
            ("FFFFFF00", "في انتظار الرد"),
            ("FFFFA500", "في انتظار الرد"),
            ("FF00FF00", "تم التعاقد"),
            ("FF4CAF50", "تم التعاقد"),
            ("FF0000FF", "اتصال مع المسؤول"),
            ("FF2196F3", "اتصال مع المسؤول"),
            ("FFFF0000", "مرفوض"),
            ("FFF44336", "مرفوض"),
            ("FFFF69B4", "اجتماع"),
            ("FF00BCD4", "اجتماع"),
            ("FF9C27B0", "تم التعاقد باقي تكملة الحساب"),
            ("FF800080", "تم التعاقد باقي تكملة الحساب"),
        ];
        for (color, status) in expected {
            assert_eq!(status_for_color(color), status, "color {}", color);
        }
    }

    #[test]
    fn test_unregistered_colors_are_empty() {
        assert_eq!(status_for_color("FFFFFFFF"), "");
        assert_eq!(status_for_color("FFE0E0E0"), "");
        assert_eq!(status_for_color(""), "");
    }

    #[test]
    fn test_every_canonical_color_decodes_to_its_status() {
        for status in Status::ALL {
            assert_eq!(status_for_color(status.color()), status.label());
        }
    }

    #[test]
    fn test_from_label_roundtrip() {
        for status in Status::ALL {
            assert_eq!(Status::from_label(status.label()), Some(status));
        }
        assert_eq!(Status::from_label("unknown"), None);
    }
}
