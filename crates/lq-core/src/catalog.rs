//! Static profession to skill-template table and its lookup.
//!
//! Lookup is total: every input, including the empty string, resolves to a
//! non-empty template list.

use crate::types::{SkillCategory, SkillLevel};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkillTemplate {
    pub name: &'static str,
    pub description: &'static str,
    pub level: SkillLevel,
    pub category: SkillCategory,
    pub importance: u8,
    pub prerequisites: &'static [&'static str],
    pub estimated_time: &'static str,
}

const fn template(
    name: &'static str,
    description: &'static str,
    level: SkillLevel,
    category: SkillCategory,
    importance: u8,
    prerequisites: &'static [&'static str],
    estimated_time: &'static str,
) -> SkillTemplate {
    SkillTemplate {
        name,
        description,
        level,
        category,
        importance,
        prerequisites,
        estimated_time,
    }
}

use SkillCategory::{Domain, Soft, Technical, Tool};
use SkillLevel::{Advanced, Beginner, Expert, Intermediate};

const WEB_DEVELOPER: &[SkillTemplate] = &[
    template("HTML Fundamentals", "Semantic markup, forms, and document structure.", Beginner, Technical, 10, &[], "2 weeks"),
    template("CSS Styling", "Selectors, the box model, flexbox, and grid layout.", Beginner, Technical, 9, &["HTML Fundamentals"], "3 weeks"),
    template("JavaScript Basics", "Variables, control flow, functions, and objects.", Beginner, Technical, 10, &["HTML Fundamentals"], "4 weeks"),
    template("Version Control with Git", "Commits, branches, merges, and pull requests.", Beginner, Tool, 9, &[], "1 week"),
    template("Responsive Design", "Media queries and mobile-first layouts.", Intermediate, Technical, 8, &["CSS Styling"], "2 weeks"),
    template("DOM Manipulation", "Querying, updating, and listening to the page.", Intermediate, Technical, 8, &["JavaScript Basics"], "2 weeks"),
    template("Modern JavaScript (ES6+)", "Modules, promises, async/await, and destructuring.", Intermediate, Technical, 8, &["JavaScript Basics"], "3 weeks"),
    template("React Fundamentals", "Components, props, state, and hooks.", Intermediate, Technical, 8, &["Modern JavaScript (ES6+)"], "4 weeks"),
    template("REST APIs", "HTTP verbs, status codes, and consuming JSON APIs.", Intermediate, Technical, 8, &["JavaScript Basics"], "2 weeks"),
    template("Node.js & Express", "Server-side JavaScript and routing.", Intermediate, Technical, 7, &["Modern JavaScript (ES6+)"], "3 weeks"),
    template("Databases & SQL", "Relational modeling, queries, and indexes.", Intermediate, Technical, 7, &[], "3 weeks"),
    template("Web Performance", "Loading strategies, caching, and profiling.", Advanced, Technical, 6, &["Responsive Design", "DOM Manipulation"], "2 weeks"),
    template("Problem Solving", "Breaking down features into small, testable steps.", Intermediate, Soft, 7, &[], "ongoing"),
];

const MOBILE_DEVELOPER: &[SkillTemplate] = &[
    template("Programming Fundamentals", "Types, control flow, and functions in a modern language.", Beginner, Technical, 10, &[], "4 weeks"),
    template("Mobile UI Design", "Layouts, navigation patterns, and platform guidelines.", Beginner, Technical, 8, &[], "2 weeks"),
    template("Swift or Kotlin", "Native language for iOS or Android.", Intermediate, Technical, 9, &["Programming Fundamentals"], "6 weeks"),
    template("React Native or Flutter", "Cross-platform app frameworks.", Intermediate, Technical, 7, &["Programming Fundamentals"], "4 weeks"),
    template("Local Storage & Offline Sync", "Persisting data on device and syncing later.", Intermediate, Technical, 7, &["Swift or Kotlin"], "2 weeks"),
    template("App Store Deployment", "Signing, review guidelines, and release tracks.", Intermediate, Tool, 6, &["Swift or Kotlin"], "1 week"),
];

const DATA_SCIENTIST: &[SkillTemplate] = &[
    template("Python Programming", "Core Python for data work.", Beginner, Technical, 10, &[], "4 weeks"),
    template("Statistics & Probability", "Distributions, inference, and hypothesis testing.", Intermediate, Domain, 9, &[], "6 weeks"),
    template("Data Wrangling with Pandas", "Cleaning, joining, and reshaping datasets.", Intermediate, Tool, 9, &["Python Programming"], "3 weeks"),
    template("Data Visualization", "Communicating findings with charts.", Beginner, Technical, 8, &["Python Programming"], "2 weeks"),
    template("SQL for Analytics", "Aggregations, window functions, and CTEs.", Intermediate, Technical, 8, &[], "2 weeks"),
    template("Machine Learning", "Supervised and unsupervised models with scikit-learn.", Advanced, Technical, 9, &["Statistics & Probability", "Data Wrangling with Pandas"], "8 weeks"),
    template("Deep Learning", "Neural networks and training loops.", Expert, Technical, 6, &["Machine Learning"], "8 weeks"),
    template("Data Storytelling", "Presenting analysis to non-technical audiences.", Intermediate, Soft, 7, &["Data Visualization"], "2 weeks"),
];

const UX_DESIGNER: &[SkillTemplate] = &[
    template("Design Principles", "Hierarchy, contrast, alignment, and spacing.", Beginner, Domain, 9, &[], "2 weeks"),
    template("User Research", "Interviews, surveys, and personas.", Beginner, Domain, 9, &[], "3 weeks"),
    template("Wireframing & Prototyping", "Low and high fidelity prototypes.", Intermediate, Tool, 8, &["Design Principles"], "3 weeks"),
    template("Figma", "Components, auto layout, and design systems.", Intermediate, Tool, 8, &["Design Principles"], "2 weeks"),
    template("Usability Testing", "Planning sessions and synthesizing findings.", Intermediate, Domain, 8, &["User Research"], "2 weeks"),
    template("Accessibility", "Inclusive design and WCAG guidelines.", Advanced, Domain, 7, &["Design Principles"], "2 weeks"),
];

const PRODUCT_MANAGER: &[SkillTemplate] = &[
    template("Product Discovery", "Finding problems worth solving.", Beginner, Domain, 9, &[], "3 weeks"),
    template("Roadmapping & Prioritization", "Frameworks like RICE and opportunity scoring.", Intermediate, Domain, 9, &["Product Discovery"], "2 weeks"),
    template("Writing Requirements", "User stories, acceptance criteria, and specs.", Beginner, Domain, 8, &[], "1 week"),
    template("Product Analytics", "Funnels, retention, and experiment design.", Intermediate, Technical, 8, &[], "3 weeks"),
    template("Stakeholder Communication", "Aligning teams and managing expectations.", Intermediate, Soft, 8, &[], "ongoing"),
    template("Agile Delivery", "Scrum, Kanban, and shipping iteratively.", Beginner, Tool, 7, &[], "1 week"),
];

const DEVOPS_ENGINEER: &[SkillTemplate] = &[
    template("Linux Administration", "Shell, processes, permissions, and networking.", Beginner, Technical, 10, &[], "4 weeks"),
    template("Scripting with Bash", "Automating routine operations.", Beginner, Technical, 8, &["Linux Administration"], "2 weeks"),
    template("Containers with Docker", "Images, volumes, and compose files.", Intermediate, Tool, 9, &["Linux Administration"], "2 weeks"),
    template("CI/CD Pipelines", "Automated build, test, and deploy.", Intermediate, Tool, 9, &[], "2 weeks"),
    template("Kubernetes", "Deployments, services, and cluster operations.", Advanced, Tool, 8, &["Containers with Docker"], "6 weeks"),
    template("Infrastructure as Code", "Terraform modules and state management.", Advanced, Tool, 8, &[], "3 weeks"),
    template("Monitoring & Observability", "Metrics, logs, traces, and alerting.", Advanced, Technical, 7, &[], "3 weeks"),
];

const GENERIC: &[SkillTemplate] = &[
    template("Time Management", "Planning work and protecting focus time.", Beginner, Soft, 8, &[], "2 weeks"),
    template("Communication Skills", "Clear writing, listening, and presenting.", Beginner, Soft, 9, &[], "3 weeks"),
    template("Critical Thinking", "Evaluating arguments and evidence.", Intermediate, Soft, 8, &[], "3 weeks"),
    template("Problem Solving", "Structured approaches to unfamiliar problems.", Intermediate, Soft, 8, &[], "ongoing"),
    template("Continuous Learning", "Building habits that keep skills current.", Beginner, Soft, 7, &[], "ongoing"),
];

/// Profession keys in lookup order. Substring matching returns the first hit
/// in this order, so more specific keys must come before broader ones.
pub const CATALOG: &[(&str, &[SkillTemplate])] = &[
    ("web developer", WEB_DEVELOPER),
    ("mobile developer", MOBILE_DEVELOPER),
    ("data scientist", DATA_SCIENTIST),
    ("ux designer", UX_DESIGNER),
    ("product manager", PRODUCT_MANAGER),
    ("devops engineer", DEVOPS_ENGINEER),
];

/// Skills returned when no profession matches.
pub fn fallback() -> &'static [SkillTemplate] {
    GENERIC
}

pub fn professions() -> impl Iterator<Item = &'static str> {
    CATALOG.iter().map(|(key, _)| *key)
}

pub fn normalize_profession(profession: &str) -> String {
    profession.trim().to_lowercase()
}

/// Resolves a profession to its templates: exact key, then the first key in
/// `CATALOG` order that contains or is contained in the input, then the
/// generic fallback. Blank input goes straight to the fallback.
pub fn lookup(profession: &str) -> &'static [SkillTemplate] {
    let needle = normalize_profession(profession);
    if needle.is_empty() {
        return GENERIC;
    }

    if let Some((_, templates)) = CATALOG.iter().find(|(key, _)| *key == needle) {
        return *templates;
    }

    CATALOG
        .iter()
        .find(|(key, _)| needle.contains(key) || key.contains(needle.as_str()))
        .map(|(_, templates)| *templates)
        .unwrap_or(GENERIC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn names(templates: &[SkillTemplate]) -> Vec<&'static str> {
        templates.iter().map(|t| t.name).collect()
    }

    #[test]
    fn exact_match_is_case_and_whitespace_insensitive() {
        let templates = lookup("  Web Developer ");
        assert_eq!(templates.len(), 13);
        assert_eq!(templates[0].name, "HTML Fundamentals");
    }

    #[test]
    fn input_containing_a_key_matches_it() {
        assert_eq!(names(lookup("senior data scientist")), names(DATA_SCIENTIST));
    }

    #[test]
    fn key_containing_the_input_matches_first_in_table_order() {
        // both developer keys contain "developer"; web developer is declared first
        assert_eq!(names(lookup("developer")), names(WEB_DEVELOPER));
        assert_eq!(names(lookup("devops")), names(DEVOPS_ENGINEER));
    }

    #[test]
    fn unknown_profession_falls_back_to_generic_skills() {
        let templates = lookup("astronaut");
        assert_eq!(templates[0].name, "Time Management");
        assert_eq!(templates[1].name, "Communication Skills");
    }

    #[test]
    fn blank_profession_falls_back_instead_of_matching_everything() {
        assert_eq!(names(lookup("")), names(GENERIC));
        assert_eq!(names(lookup("   ")), names(GENERIC));
    }

    #[test]
    fn catalog_entries_are_well_formed() {
        for (key, templates) in CATALOG {
            assert_eq!(*key, normalize_profession(key));
            assert!(!templates.is_empty());
            for template in templates.iter() {
                assert!((1..=10).contains(&template.importance), "{}", template.name);
            }
        }
        for template in GENERIC {
            assert_eq!(template.category, SkillCategory::Soft);
        }
    }

    #[test]
    fn prerequisites_name_skills_in_the_same_list() {
        for (_, templates) in CATALOG {
            let known = names(templates);
            for template in templates.iter() {
                for prerequisite in template.prerequisites {
                    assert!(known.contains(prerequisite), "{prerequisite}");
                }
            }
        }
    }

    proptest! {
        #[test]
        fn lookup_is_total(input in ".*") {
            prop_assert!(!lookup(&input).is_empty());
        }

        #[test]
        fn lookup_is_deterministic(input in "[a-zA-Z ]{0,24}") {
            prop_assert_eq!(names(lookup(&input)), names(lookup(&input)));
        }
    }
}
