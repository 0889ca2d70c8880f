use crate::tree::{EntryKind, RepositoryTree};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Index over a flattened tree used to answer segment/extension predicates
///
/// Built once per classification; predicates check explicit path components
/// and extensions instead of scanning a raw text blob, which keeps matching
/// from tripping over unrelated substrings elsewhere in a path.
struct TreeIndex<'a> {
    /// Every path component of every entry
    segments: HashSet<&'a str>,
    /// Lowercased extensions of file entries
    extensions: HashSet<String>,
    /// Final path components of file entries
    file_names: HashSet<&'a str>,
    /// Full relative paths of all entries
    paths: Vec<&'a str>,
}

impl<'a> TreeIndex<'a> {
    fn build(tree: &'a RepositoryTree) -> Self {
        let mut segments = HashSet::new();
        let mut extensions = HashSet::new();
        let mut file_names = HashSet::new();
        let mut paths = Vec::with_capacity(tree.len());

        for entry in tree.entries() {
            paths.push(entry.path.as_str());
            for segment in entry.path.split('/') {
                segments.insert(segment);
            }
            if entry.kind == EntryKind::File {
                let name = entry.name();
                file_names.insert(name);
                if let Some((stem, ext)) = name.rsplit_once('.') {
                    if !stem.is_empty() {
                        extensions.insert(ext.to_ascii_lowercase());
                    }
                }
            }
        }

        Self {
            segments,
            extensions,
            file_names,
            paths,
        }
    }

    fn segment(&self, name: &str) -> bool {
        self.segments.contains(name)
    }

    fn any_segment(&self, names: &[&str]) -> bool {
        names.iter().any(|n| self.segment(n))
    }

    fn segment_containing(&self, needle: &str) -> bool {
        self.segments.iter().any(|s| s.contains(needle))
    }

    fn extension(&self, ext: &str) -> bool {
        self.extensions.contains(ext)
    }

    fn any_extension(&self, exts: &[&str]) -> bool {
        exts.iter().any(|e| self.extension(e))
    }

    fn file(&self, name: &str) -> bool {
        self.file_names.contains(name)
    }

    fn any_file(&self, names: &[&str]) -> bool {
        names.iter().any(|n| self.file(n))
    }

    fn file_name_starting_with(&self, prefix: &str) -> bool {
        self.file_names.iter().any(|n| n.starts_with(prefix))
    }

    fn path_starting_with(&self, prefix: &str) -> bool {
        self.paths.iter().any(|p| p.starts_with(prefix))
    }
}

/// Boolean feature flags evaluated over a repository tree
///
/// Each flag is an independent presence test; flags are not mutually
/// exclusive and no flag depends on another's value. The record is built
/// once by [`classify`] and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlags {
    /// `test`, `tests`, or `__tests__` path segment
    pub has_tests: bool,
    /// `Dockerfile` or a `docker-compose*` file
    pub has_docker: bool,
    /// `.github/workflows` tree or `.gitlab-ci.yml`
    pub has_ci: bool,
    /// `api`, `routes`, or `controllers` segment
    pub has_api: bool,
    /// `docs` or `documentation` segment
    pub has_docs: bool,
    /// `benchmark(s)` or `performance` segment
    pub has_benchmarks: bool,
    /// `examples`, `demo`, or `demos` segment
    pub has_examples: bool,
    /// A `CHANGELOG*` file
    pub has_changelog: bool,
    /// A `CONTRIBUTING*` file
    pub has_contributing: bool,
    /// A `package.json` file
    pub has_package_json: bool,
    /// `requirements.txt` or `Pipfile`
    pub has_requirements: bool,
    /// A conventional entry point (`index.js/ts`, `main.js/ts`, `app.js/ts`,
    /// `app.py`, `main.py`)
    pub has_main_file: bool,
    /// Any `.html` file
    pub has_html: bool,
    /// Any `.css` or `.scss` file
    pub has_css: bool,
    /// `.jsx`/`.tsx` sources or a `react`-named segment
    pub has_react: bool,
    /// A checked-in `node_modules` directory
    pub has_node_modules: bool,
    /// Any `.py` file
    pub has_python_sources: bool,
    /// A `.gitignore` file
    pub has_gitignore: bool,
    /// `config` segment or dotenv files
    pub has_config: bool,
    /// `src` segment
    pub has_src: bool,
    /// `dist` or `build` segment
    pub has_dist: bool,
    /// `public` segment
    pub has_public: bool,
    /// `assets` or `static` segment
    pub has_assets: bool,
    /// `data` segment or `.json`/`.csv` files
    pub has_data: bool,
    /// `images`/`img` segment or image files
    pub has_images: bool,
    /// `scripts` segment or shell/batch files
    pub has_scripts: bool,
    /// `utils`, `helpers`, or `lib` segment
    pub has_utils: bool,
    /// `components` segment
    pub has_components: bool,
    /// `pages` or `views` segment
    pub has_pages: bool,
    /// `services` or `api` segment
    pub has_services: bool,
    /// `models`, `types`, or `interfaces` segment
    pub has_models: bool,
}

impl FeatureFlags {
    fn evaluate(index: &TreeIndex<'_>) -> Self {
        Self {
            has_tests: index.any_segment(&["test", "tests", "__tests__"]),
            has_docker: index.file("Dockerfile") || index.file_name_starting_with("docker-compose"),
            has_ci: index.path_starting_with(".github/workflows") || index.file(".gitlab-ci.yml"),
            has_api: index.any_segment(&["api", "routes", "controllers"]),
            has_docs: index.any_segment(&["docs", "documentation"]),
            has_benchmarks: index.any_segment(&["benchmark", "benchmarks", "performance"]),
            has_examples: index.any_segment(&["examples", "demo", "demos"]),
            has_changelog: index.file_name_starting_with("CHANGELOG"),
            has_contributing: index.file_name_starting_with("CONTRIBUTING"),
            has_package_json: index.file("package.json"),
            has_requirements: index.any_file(&["requirements.txt", "Pipfile"]),
            has_main_file: index.any_file(&[
                "index.js", "index.ts", "main.js", "main.ts", "app.js", "app.ts", "app.py",
                "main.py",
            ]),
            has_html: index.extension("html"),
            has_css: index.any_extension(&["css", "scss"]),
            has_react: index.any_extension(&["jsx", "tsx"]) || index.segment_containing("react"),
            has_node_modules: index.segment("node_modules"),
            has_python_sources: index.extension("py"),
            has_gitignore: index.file(".gitignore"),
            has_config: index.segment("config") || index.file_name_starting_with(".env"),
            has_src: index.segment("src"),
            has_dist: index.any_segment(&["dist", "build"]),
            has_public: index.segment("public"),
            has_assets: index.any_segment(&["assets", "static"]),
            has_data: index.segment("data") || index.any_extension(&["json", "csv"]),
            has_images: index.any_segment(&["images", "img"]) || index.any_extension(&["png", "jpg"]),
            has_scripts: index.segment("scripts") || index.any_extension(&["sh", "bat"]),
            has_utils: index.any_segment(&["utils", "helpers", "lib"]),
            has_components: index.segment("components"),
            has_pages: index.any_segment(&["pages", "views"]),
            has_services: index.any_segment(&["services", "api"]),
            has_models: index.any_segment(&["models", "types", "interfaces"]),
        }
    }

    /// Iterates over every flag as a `(name, value)` pair, in declaration
    /// order, so callers can render or assert over the full set without
    /// field-by-field code
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, bool)> {
        [
            ("has_tests", self.has_tests),
            ("has_docker", self.has_docker),
            ("has_ci", self.has_ci),
            ("has_api", self.has_api),
            ("has_docs", self.has_docs),
            ("has_benchmarks", self.has_benchmarks),
            ("has_examples", self.has_examples),
            ("has_changelog", self.has_changelog),
            ("has_contributing", self.has_contributing),
            ("has_package_json", self.has_package_json),
            ("has_requirements", self.has_requirements),
            ("has_main_file", self.has_main_file),
            ("has_html", self.has_html),
            ("has_css", self.has_css),
            ("has_react", self.has_react),
            ("has_node_modules", self.has_node_modules),
            ("has_python_sources", self.has_python_sources),
            ("has_gitignore", self.has_gitignore),
            ("has_config", self.has_config),
            ("has_src", self.has_src),
            ("has_dist", self.has_dist),
            ("has_public", self.has_public),
            ("has_assets", self.has_assets),
            ("has_data", self.has_data),
            ("has_images", self.has_images),
            ("has_scripts", self.has_scripts),
            ("has_utils", self.has_utils),
            ("has_components", self.has_components),
            ("has_pages", self.has_pages),
            ("has_services", self.has_services),
            ("has_models", self.has_models),
        ]
        .into_iter()
    }

    /// True when no flag matched at all
    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, value)| !value)
    }
}

/// Single-label project classification derived from [`FeatureFlags`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectType {
    /// Python sources or a pip/Pipenv manifest
    Python,
    /// Browser-facing HTML/CSS/React evidence
    Web,
    /// `package.json` or a vendored `node_modules`
    NodeJs,
    /// Conventional entry point without web evidence
    Cli,
    /// `src` layout without HTML
    Library,
    /// None of the above
    Unknown,
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProjectType::Python => "Python",
            ProjectType::Web => "Web",
            ProjectType::NodeJs => "Node.js",
            ProjectType::Cli => "CLI",
            ProjectType::Library => "Library",
            ProjectType::Unknown => "Unknown",
        };
        write!(f, "{}", label)
    }
}

fn is_python(f: &FeatureFlags) -> bool {
    f.has_requirements || f.has_python_sources
}

fn is_web(f: &FeatureFlags) -> bool {
    f.has_html || f.has_css || f.has_react
}

fn is_node(f: &FeatureFlags) -> bool {
    f.has_package_json || f.has_node_modules
}

fn is_cli(f: &FeatureFlags) -> bool {
    f.has_main_file && !is_web(f)
}

fn is_library(f: &FeatureFlags) -> bool {
    f.has_src && !f.has_html
}

/// Ordered type-derivation rules; the first matching rule wins.
///
/// Python outranks everything so a Python backend shipping an HTML demo
/// page still classifies as Python, and Web outranks Node.js so a React
/// app with its `package.json` classifies as Web.
const TYPE_RULES: &[(ProjectType, fn(&FeatureFlags) -> bool)] = &[
    (ProjectType::Python, is_python),
    (ProjectType::Web, is_web),
    (ProjectType::NodeJs, is_node),
    (ProjectType::Cli, is_cli),
    (ProjectType::Library, is_library),
];

/// Result of classifying a repository tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Independent presence flags
    pub flags: FeatureFlags,
    /// Single collapsed label for downstream content generation
    pub project_type: ProjectType,
}

/// Classifies a flattened repository tree
///
/// Total over any input: an empty tree yields all-false flags and
/// [`ProjectType::Unknown`]. Pure function; classifying the same tree twice
/// yields identical results.
pub fn classify(tree: &RepositoryTree) -> Classification {
    let index = TreeIndex::build(tree);
    let flags = FeatureFlags::evaluate(&index);
    let project_type = TYPE_RULES
        .iter()
        .find(|(_, rule)| rule(&flags))
        .map(|(ty, _)| *ty)
        .unwrap_or(ProjectType::Unknown);

    Classification {
        flags,
        project_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn tree(paths: &[&str]) -> RepositoryTree {
        RepositoryTree::from_paths(paths.iter().copied())
    }

    #[test]
    fn test_empty_tree_is_unknown() {
        let result = classify(&RepositoryTree::default());

        assert!(result.flags.is_empty());
        assert_eq!(result.project_type, ProjectType::Unknown);
    }

    #[test]
    fn test_python_repo_scenario() {
        let result = classify(&tree(&[
            "src/",
            "src/main.py",
            "requirements.txt",
            "tests/",
            "tests/test_main.py",
        ]));

        assert!(result.flags.has_src);
        assert!(result.flags.has_tests);
        assert!(result.flags.has_requirements);
        assert!(result.flags.has_python_sources);
        assert_eq!(result.project_type, ProjectType::Python);
    }

    #[test]
    fn test_react_app_scenario() {
        let result = classify(&tree(&["package.json", "index.html", "src/App.jsx"]));

        assert!(result.flags.has_package_json);
        assert!(result.flags.has_html);
        assert!(result.flags.has_react);
        assert_eq!(result.project_type, ProjectType::Web);
    }

    #[test]
    fn test_python_beats_node() {
        let result = classify(&tree(&["requirements.txt", "package.json"]));
        assert_eq!(result.project_type, ProjectType::Python);
    }

    #[test]
    fn test_python_with_html_demo_stays_python() {
        let result = classify(&tree(&["app.py", "demo/", "demo/index.html"]));
        assert_eq!(result.project_type, ProjectType::Python);
    }

    #[test]
    fn test_requirements_forces_python_flag() {
        let result = classify(&tree(&["requirements.txt", "index.html", "whatever.c"]));
        assert!(result.flags.has_requirements);
        assert_eq!(result.project_type, ProjectType::Python);
    }

    #[test]
    fn test_classification_is_idempotent() {
        let input = tree(&["package.json", "src/", "src/index.ts"]);

        let first = classify(&input);
        let second = classify(&input);
        assert_eq!(first, second);
    }

    #[test_case(&["package.json", "server.js"], ProjectType::NodeJs; "plain node backend")]
    #[test_case(&["main.go", "main.ts"], ProjectType::Cli; "entry point without web evidence")]
    #[test_case(&["src/", "src/lib.rs", "Cargo.toml"], ProjectType::Library; "src layout")]
    #[test_case(&["LICENSE"], ProjectType::Unknown; "no signals")]
    #[test_case(&["styles.css"], ProjectType::Web; "stylesheet only")]
    fn test_type_precedence(paths: &[&str], expected: ProjectType) {
        assert_eq!(classify(&tree(paths)).project_type, expected);
    }

    #[test]
    fn test_segment_matching_avoids_substring_false_positives() {
        // "protests.rs" contains "tests" as a substring but not as a path
        // segment; "api" only matches as a whole component.
        let result = classify(&tree(&["protests.rs", "rapid/", "rapid/notes.md"]));

        assert!(!result.flags.has_tests);
        assert!(!result.flags.has_api);
    }

    #[test]
    fn test_docker_and_ci_detection() {
        let result = classify(&tree(&[
            "Dockerfile",
            "docker-compose.yml",
            ".github/workflows/ci.yml",
        ]));

        assert!(result.flags.has_docker);
        assert!(result.flags.has_ci);
    }

    #[test]
    fn test_flag_iter_covers_every_field() {
        let flags = FeatureFlags {
            has_tests: true,
            ..FeatureFlags::default()
        };

        let pairs: Vec<_> = flags.iter().collect();
        assert_eq!(pairs.len(), 31);
        assert!(pairs.contains(&("has_tests", true)));
        assert!(pairs.contains(&("has_models", false)));
    }
}
