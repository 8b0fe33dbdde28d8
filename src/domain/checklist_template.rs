//! The fixed page-audit checklist every session starts from.

use std::collections::HashSet;

/// Heading shown above [`DEFAULT_CHECKLIST`].
pub const CHECKLIST_TITLE: &str = "Page Audit Checklist";

#[derive(Debug, PartialEq, Eq)]
pub struct TemplateItem {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Debug, PartialEq, Eq)]
pub struct TemplateCategory {
    pub id: &'static str,
    pub name: &'static str,
    pub items: &'static [TemplateItem],
}

const fn item(id: &'static str, title: &'static str, description: &'static str) -> TemplateItem {
    TemplateItem {
        id,
        title,
        description,
    }
}

pub static DEFAULT_CHECKLIST: &[TemplateCategory] = &[
    TemplateCategory {
        id: "structure",
        name: "Page Structure",
        items: &[
            item(
                "title-meta",
                "Page Title & Meta Description",
                "Check page title and meta description for SEO optimization",
            ),
            item(
                "heading-hierarchy",
                "Heading Hierarchy",
                "Verify all headings follow proper hierarchy (H1, H2, H3)",
            ),
            item(
                "breadcrumbs",
                "Navigation Breadcrumbs",
                "Ensure navigation breadcrumbs are present and accurate",
            ),
            item(
                "layout-consistency",
                "Layout Consistency",
                "Confirm page layout is consistent with brand guidelines",
            ),
        ],
    },
    TemplateCategory {
        id: "content",
        name: "Content Quality",
        items: &[
            item(
                "spelling-grammar",
                "Spelling and Grammar",
                "Review all text for spelling and grammar errors",
            ),
            item(
                "project-descriptions",
                "Project Descriptions",
                "Verify project descriptions are clear and complete",
            ),
            item(
                "dates-timelines",
                "Dates and Timelines",
                "Check that all dates and timelines are current",
            ),
            item(
                "data-accuracy",
                "Data Accuracy",
                "Ensure all statistics and data points are accurate",
            ),
            item(
                "links-references",
                "Links and References",
                "Validate all links and references",
            ),
        ],
    },
    TemplateCategory {
        id: "visual",
        name: "Visual Elements",
        items: &[
            item(
                "image-optimization",
                "Image Optimization",
                "Optimize all images with alt text and proper sizing",
            ),
            item(
                "graphics-quality",
                "Graphics Quality",
                "Check that all graphics are high-resolution",
            ),
            item(
                "image-captions",
                "Image Captions",
                "Verify image captions are accurate",
            ),
            item(
                "visual-hierarchy",
                "Visual Hierarchy",
                "Ensure visual hierarchy guides users effectively",
            ),
            item(
                "icons-logos",
                "Icons and Logos",
                "Confirm all icons and logos are current versions",
            ),
        ],
    },
    TemplateCategory {
        id: "technical",
        name: "Technical Requirements",
        items: &[
            item("loading-speed", "Page Loading Speed", "Test page loading speed"),
            item(
                "mobile-responsive",
                "Mobile Responsiveness",
                "Verify mobile responsiveness",
            ),
            item(
                "interactive-elements",
                "Interactive Elements",
                "Check all interactive elements function properly",
            ),
            item(
                "form-submissions",
                "Form Submissions",
                "Validate form submissions if applicable",
            ),
            item(
                "browser-compatibility",
                "Browser Compatibility",
                "Test cross-browser compatibility",
            ),
        ],
    },
    TemplateCategory {
        id: "ux",
        name: "User Experience",
        items: &[
            item(
                "cta-buttons",
                "Call-to-Action Buttons",
                "Verify call-to-action buttons are prominent",
            ),
            item(
                "contact-info",
                "Contact Information",
                "Check that contact information is easily accessible",
            ),
            item(
                "status-indicators",
                "Status Indicators",
                "Ensure project status indicators are clear",
            ),
            item(
                "downloadable-resources",
                "Downloadable Resources",
                "Test all downloadable resources",
            ),
            item(
                "social-sharing",
                "Social Sharing",
                "Verify social sharing functionality",
            ),
        ],
    },
    TemplateCategory {
        id: "documentation",
        name: "Documentation",
        items: &[
            item("changelog", "Project Changelog", "Update project changelog"),
            item("major-changes", "Major Changes", "Record any major changes made"),
            item(
                "outstanding-issues",
                "Outstanding Issues",
                "Document any outstanding issues",
            ),
            item(
                "future-improvements",
                "Future Improvements",
                "Note areas for future improvement",
            ),
            item("backup", "Page Backup", "Create backup of original pages"),
        ],
    },
    TemplateCategory {
        id: "final",
        name: "Final Review",
        items: &[
            item("page-preview", "Full Page Preview", "Conduct full page preview"),
            item(
                "stakeholder-approval",
                "Stakeholder Approval",
                "Get stakeholder approval",
            ),
            item(
                "staging-test",
                "Staging Environment",
                "Test all updates in staging environment",
            ),
            item(
                "publication-date",
                "Publication Date",
                "Schedule publication date",
            ),
            item(
                "maintenance-checks",
                "Maintenance Checks",
                "Plan for regular maintenance checks",
            ),
        ],
    },
];

/// First item id that appears more than once across all categories.
pub fn duplicate_item_id(template: &[TemplateCategory]) -> Option<&'static str> {
    let mut seen = HashSet::new();
    template
        .iter()
        .flat_map(|category| category.items.iter())
        .find(|item| !seen.insert(item.id))
        .map(|item| item.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_ids_are_unique_across_categories() {
        assert_eq!(duplicate_item_id(DEFAULT_CHECKLIST), None);
        let count: usize = DEFAULT_CHECKLIST.iter().map(|c| c.items.len()).sum();
        assert_eq!(count, 34);
    }

    #[test]
    fn finds_ids_repeated_in_another_category() {
        static REPEATED: &[TemplateCategory] = &[
            TemplateCategory {
                id: "a",
                name: "A",
                items: &[
                    item("fans", "Fans", "Fans spin"),
                    item("dust", "Dust", "Filters clean"),
                ],
            },
            TemplateCategory {
                id: "b",
                name: "B",
                items: &[item("fans", "Fans again", "Duplicate")],
            },
        ];
        assert_eq!(duplicate_item_id(REPEATED), Some("fans"));
    }

    #[test]
    fn title_describes_a_page_audit() {
        assert_eq!(CHECKLIST_TITLE, "Page Audit Checklist");
        assert_eq!(DEFAULT_CHECKLIST[0].name, "Page Structure");
    }

    #[test]
    fn has_seven_categories() {
        let ids: Vec<_> = DEFAULT_CHECKLIST.iter().map(|c| c.id).collect();
        assert_eq!(
            ids,
            ["structure", "content", "visual", "technical", "ux", "documentation", "final"]
        );
    }
}
