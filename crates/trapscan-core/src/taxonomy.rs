use crate::model::{FindingCategory, Verdict};

/// Display metadata for one finding category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryInfo {
    pub category: FindingCategory,
    pub icon: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

/// Display metadata for a verdict banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerdictInfo {
    pub icon: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

/// Static registry of finding categories in presentation order.
#[derive(Debug, Clone, Copy)]
pub struct Taxonomy {
    entries: &'static [CategoryInfo],
}

static ENTRIES: [CategoryInfo; 5] = [
    CategoryInfo {
        category: FindingCategory::WhiteText,
        icon: "🎨",
        title: "White/Hidden Text",
        description: "Text colored white to hide on white backgrounds",
    },
    CategoryInfo {
        category: FindingCategory::InvisibleChars,
        icon: "👻",
        title: "Invisible Characters",
        description: "Zero-width and hidden Unicode characters",
    },
    CategoryInfo {
        category: FindingCategory::SmallText,
        icon: "🔬",
        title: "Microscopic Text",
        description: "Text too small to see (under 2pt)",
    },
    CategoryInfo {
        category: FindingCategory::HiddenText,
        icon: "🙈",
        title: "Hidden Text Property",
        description: "Word document hidden text formatting",
    },
    CategoryInfo {
        category: FindingCategory::HiddenLayers,
        icon: "📑",
        title: "Hidden Layers",
        description: "Hidden PDF layers or annotations",
    },
];

impl Taxonomy {
    pub fn standard() -> Self {
        Self { entries: &ENTRIES }
    }

    pub fn entries(&self) -> &'static [CategoryInfo] {
        self.entries
    }

    pub fn get(&self, category: FindingCategory) -> Option<&'static CategoryInfo> {
        self.entries
            .iter()
            .find(|entry| entry.category == category)
    }

    pub fn verdict(&self, verdict: Verdict) -> VerdictInfo {
        verdict_info(verdict)
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::standard()
    }
}

fn verdict_info(verdict: Verdict) -> VerdictInfo {
    match verdict {
        Verdict::Clean => VerdictInfo {
            icon: "✅",
            title: "No Traps Detected",
            description: "This file appears clean. No hidden text or suspicious content found.",
        },
        Verdict::Low => VerdictInfo {
            icon: "⚡",
            title: "Minor Findings",
            description: "Some unusual characters detected. Probably safe, but review below.",
        },
        Verdict::Medium => VerdictInfo {
            icon: "⚠️",
            title: "Suspicious Content Found",
            description: "This file contains hidden content. Review the findings carefully.",
        },
        Verdict::High => VerdictInfo {
            icon: "🚨",
            title: "TRAP DETECTED!",
            description: "This file contains hidden instructions that could be read by AI!",
        },
        Verdict::Unknown => VerdictInfo {
            icon: "?",
            title: "Unrecognized Verdict",
            description: "The analysis service returned a verdict this client does not understand. Review the findings below.",
        },
    }
}
