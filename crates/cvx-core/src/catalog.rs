//! Technology pattern dictionary and the filter catalog built on it.
//!
//! Each canonical tag maps to the lowercase substrings that signal it in
//! free text. Aliases overlap on purpose: `"node.js"` marks both
//! `javascript` and `nodejs`. The table is a detector, not a partition.

use serde::Serialize;

/// `(tag, aliases)` pairs, in display order.
static TECH_PATTERNS: &[(&str, &[&str])] = &[
    ("javascript", &["javascript", "js", "node.js", "nodejs"]),
    ("typescript", &["typescript", "ts"]),
    ("python", &["python", "django", "flask", "fastapi"]),
    ("java", &["java", "spring", "spring boot", "springboot"]),
    ("csharp", &["c#", "csharp", ".net", "dotnet", "asp.net"]),
    ("php", &["php", "laravel", "symfony"]),
    ("ruby", &["ruby", "rails", "ruby on rails"]),
    ("go", &["golang", "go"]),
    ("react", &["react", "reactjs", "react.js"]),
    ("vue", &["vue", "vuejs", "vue.js"]),
    ("angular", &["angular", "angularjs"]),
    ("svelte", &["svelte", "sveltekit"]),
    ("nextjs", &["next.js", "nextjs", "next"]),
    ("nodejs", &["node.js", "nodejs", "node"]),
    ("express", &["express", "expressjs", "express.js"]),
    ("django", &["django"]),
    ("flask", &["flask"]),
    ("spring", &["spring", "spring boot", "springboot"]),
    ("dotnet", &[".net", "dotnet", "asp.net"]),
    ("docker", &["docker", "containerization"]),
    ("kubernetes", &["kubernetes", "k8s"]),
    ("aws", &["aws", "amazon web services"]),
    ("mongodb", &["mongodb", "mongo"]),
    ("postgresql", &["postgresql", "postgres"]),
];

/// Grouping used when presenting filter options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Language,
    Framework,
    Technology,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 3] = [Category::Language, Category::Framework, Category::Technology];

    /// Heading shown above a group of filter options.
    pub fn label(self) -> &'static str {
        match self {
            Category::Language => "Languages",
            Category::Framework => "Frameworks",
            Category::Technology => "Technologies",
        }
    }
}

/// A selectable technology filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterOption {
    /// Canonical tag, identical to the dictionary key.
    pub id: &'static str,
    /// Human-readable name.
    pub label: &'static str,
    pub category: Category,
}

static FILTER_OPTIONS: &[FilterOption] = &[
    FilterOption { id: "javascript", label: "JavaScript", category: Category::Language },
    FilterOption { id: "typescript", label: "TypeScript", category: Category::Language },
    FilterOption { id: "python", label: "Python", category: Category::Language },
    FilterOption { id: "java", label: "Java", category: Category::Language },
    FilterOption { id: "csharp", label: "C#", category: Category::Language },
    FilterOption { id: "php", label: "PHP", category: Category::Language },
    FilterOption { id: "ruby", label: "Ruby", category: Category::Language },
    FilterOption { id: "go", label: "Go", category: Category::Language },
    FilterOption { id: "react", label: "React", category: Category::Framework },
    FilterOption { id: "vue", label: "Vue.js", category: Category::Framework },
    FilterOption { id: "angular", label: "Angular", category: Category::Framework },
    FilterOption { id: "svelte", label: "Svelte", category: Category::Framework },
    FilterOption { id: "nextjs", label: "Next.js", category: Category::Framework },
    FilterOption { id: "nodejs", label: "Node.js", category: Category::Framework },
    FilterOption { id: "express", label: "Express", category: Category::Framework },
    FilterOption { id: "django", label: "Django", category: Category::Framework },
    FilterOption { id: "flask", label: "Flask", category: Category::Framework },
    FilterOption { id: "spring", label: "Spring", category: Category::Framework },
    FilterOption { id: "dotnet", label: ".NET", category: Category::Framework },
    FilterOption { id: "docker", label: "Docker", category: Category::Technology },
    FilterOption { id: "kubernetes", label: "Kubernetes", category: Category::Technology },
    FilterOption { id: "aws", label: "AWS", category: Category::Technology },
    FilterOption { id: "mongodb", label: "MongoDB", category: Category::Technology },
    FilterOption { id: "postgresql", label: "PostgreSQL", category: Category::Technology },
];

/// The dictionary as `(tag, aliases)` pairs.
pub fn patterns() -> &'static [(&'static str, &'static [&'static str])] {
    TECH_PATTERNS
}

/// The filter catalog, in display order.
pub fn filter_options() -> &'static [FilterOption] {
    FILTER_OPTIONS
}

/// Filter options belonging to `category`, in display order.
pub fn options_in(category: Category) -> impl Iterator<Item = &'static FilterOption> {
    FILTER_OPTIONS.iter().filter(move |o| o.category == category)
}

pub fn find_option(id: &str) -> Option<&'static FilterOption> {
    FILTER_OPTIONS.iter().find(|o| o.id == id)
}

/// Whether `id` is a tag the extractor can ever produce.
pub fn is_known_tag(id: &str) -> bool {
    TECH_PATTERNS.iter().any(|(tag, _)| *tag == id)
}
