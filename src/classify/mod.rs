//! File classification: map each source file to exactly one category.
//!
//! Classification is pure, total, and deterministic. The matching precedence
//! is itself a contract: a file matching several categories resolves to the
//! earliest-checked one (scaffold, build, test, docs, asset, skeleton,
//! feature), with feature as the catch-all.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// The seven classifier buckets, declared in planning order.
///
/// Planning order is a correctness requirement, not cosmetic: a consumer
/// must be able to build the project at every commit boundary, so
/// scaffolding and build tooling precede code, and tests/docs follow
/// features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Scaffold,
    Build,
    Skeleton,
    Feature,
    Test,
    Docs,
    Asset,
}

impl Category {
    /// All categories in planning order.
    pub const PLAN_ORDER: [Category; 7] = [
        Category::Scaffold,
        Category::Build,
        Category::Skeleton,
        Category::Feature,
        Category::Test,
        Category::Docs,
        Category::Asset,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Scaffold => "scaffold",
            Category::Build => "build",
            Category::Skeleton => "skeleton",
            Category::Feature => "feature",
            Category::Test => "test",
            Category::Docs => "docs",
            Category::Asset => "asset",
        }
    }

    /// Conventional commit type for this category. Display metadata only.
    pub fn commit_type(&self) -> CommitType {
        match self {
            Category::Scaffold => CommitType::Chore,
            Category::Build => CommitType::Build,
            Category::Skeleton | Category::Feature => CommitType::Feat,
            Category::Test => CommitType::Test,
            Category::Docs => CommitType::Docs,
            Category::Asset => CommitType::Style,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Conventional commit types emitted by the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitType {
    Feat,
    Docs,
    Style,
    Test,
    Build,
    Chore,
}

impl CommitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommitType::Feat => "feat",
            CommitType::Docs => "docs",
            CommitType::Style => "style",
            CommitType::Test => "test",
            CommitType::Build => "build",
            CommitType::Chore => "chore",
        }
    }
}

impl std::fmt::Display for CommitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Package manifests and lockfiles that mark the build category.
const BUILD_MANIFESTS: &[&str] = &[
    "cargo.toml",
    "cargo.lock",
    "package.json",
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "pyproject.toml",
    "requirements.txt",
    "setup.py",
    "go.mod",
    "go.sum",
    "makefile",
    "cmakelists.txt",
    "build.gradle",
    "pom.xml",
    "gemfile",
    "dockerfile",
    "docker-compose.yml",
];

/// Bundler/compiler config name fragments.
const BUILD_CONFIG_STEMS: &[&str] = &[
    "webpack.config",
    "rollup.config",
    "vite.config",
    "babel.config",
    "jest.config",
    "tsconfig",
    "eslint.config",
];

/// Editor/formatter config filenames that mark scaffold.
const SCAFFOLD_CONFIGS: &[&str] = &[
    ".editorconfig",
    ".prettierrc",
    ".prettierrc.json",
    ".eslintrc",
    ".eslintrc.json",
    ".eslintrc.js",
    ".babelrc",
    ".nvmrc",
];

const ASSET_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "svg", "ico", "css", "scss", "sass", "less", "woff", "woff2",
    "ttf",
];

const DOCS_EXTENSIONS: &[&str] = &["md", "rst", "txt"];

/// Classify a file by its path relative to the source root.
///
/// Every file maps to exactly one category; `Feature` is the catch-all.
pub fn classify(rel_path: &Path) -> Category {
    let base = rel_path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let extension = rel_path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let dirs: Vec<String> = rel_path
        .parent()
        .map(|p| {
            p.components()
                .map(|c| c.as_os_str().to_string_lossy().to_lowercase())
                .collect()
        })
        .unwrap_or_default();
    let path_str = rel_path.to_string_lossy().to_lowercase();

    if is_scaffold(&base) {
        Category::Scaffold
    } else if is_build(&base, &dirs) {
        Category::Build
    } else if is_test(&base, &dirs) {
        Category::Test
    } else if is_docs(&extension, &dirs) {
        Category::Docs
    } else if is_asset(&extension, &dirs) {
        Category::Asset
    } else if is_skeleton(&base, &path_str) {
        Category::Skeleton
    } else {
        Category::Feature
    }
}

fn is_scaffold(base: &str) -> bool {
    base.ends_with("ignore")
        || base.contains("license")
        || base.contains("licence")
        || base.starts_with("readme")
        || SCAFFOLD_CONFIGS.contains(&base)
}

fn is_build(base: &str, dirs: &[String]) -> bool {
    BUILD_MANIFESTS.contains(&base)
        || BUILD_CONFIG_STEMS.iter().any(|stem| base.starts_with(stem))
        || dirs.iter().any(|d| d == "config")
}

fn is_test(base: &str, dirs: &[String]) -> bool {
    base.contains("test")
        || base.contains("spec")
        || dirs.iter().any(|d| d.contains("test") || d.contains("spec"))
}

fn is_docs(extension: &str, dirs: &[String]) -> bool {
    DOCS_EXTENSIONS.contains(&extension) || dirs.iter().any(|d| d.contains("doc"))
}

fn is_asset(extension: &str, dirs: &[String]) -> bool {
    dirs.iter().any(|d| d.contains("asset")) || ASSET_EXTENSIONS.contains(&extension)
}

fn is_skeleton(base: &str, path_str: &str) -> bool {
    path_str.contains("index") || base.contains("main") || base.contains("app")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn cat(path: &str) -> Category {
        classify(Path::new(path))
    }

    #[test]
    fn test_scaffold_markers() {
        assert_eq!(cat(".gitignore"), Category::Scaffold);
        assert_eq!(cat(".dockerignore"), Category::Scaffold);
        assert_eq!(cat("LICENSE"), Category::Scaffold);
        assert_eq!(cat("README.md"), Category::Scaffold);
        assert_eq!(cat(".editorconfig"), Category::Scaffold);
    }

    #[test]
    fn test_build_markers() {
        assert_eq!(cat("Cargo.toml"), Category::Build);
        assert_eq!(cat("package.json"), Category::Build);
        assert_eq!(cat("webpack.config.js"), Category::Build);
        assert_eq!(cat("tsconfig.json"), Category::Build);
        assert_eq!(cat("config/settings.yml"), Category::Build);
    }

    #[test]
    fn test_test_markers() {
        assert_eq!(cat("src/parser_test.rs"), Category::Test);
        assert_eq!(cat("tests/integration.rs"), Category::Test);
        assert_eq!(cat("src/__tests__/utils.js"), Category::Test);
        assert_eq!(cat("spec/widget_spec.rb"), Category::Test);
    }

    #[test]
    fn test_docs_markers() {
        assert_eq!(cat("docs/guide.html"), Category::Docs);
        assert_eq!(cat("CONTRIBUTING.md"), Category::Docs);
        assert_eq!(cat("notes.txt"), Category::Docs);
    }

    #[test]
    fn test_asset_markers() {
        assert_eq!(cat("assets/logo.svg"), Category::Asset);
        assert_eq!(cat("styles/theme.css"), Category::Asset);
        assert_eq!(cat("public/favicon.ico"), Category::Asset);
    }

    #[test]
    fn test_skeleton_markers() {
        assert_eq!(cat("src/index.ts"), Category::Skeleton);
        assert_eq!(cat("src/main.rs"), Category::Skeleton);
        assert_eq!(cat("src/app.py"), Category::Skeleton);
    }

    #[test]
    fn test_feature_catch_all() {
        assert_eq!(cat("src/parser.rs"), Category::Feature);
        assert_eq!(cat("lib/util/strings.go"), Category::Feature);
    }

    #[test]
    fn test_precedence_is_first_match() {
        // README.md matches both scaffold and docs; scaffold is checked first.
        assert_eq!(cat("README.md"), Category::Scaffold);
        // requirements.txt matches build before the .txt docs extension.
        assert_eq!(cat("requirements.txt"), Category::Build);
        // A test under assets/ resolves to test, which precedes asset.
        assert_eq!(cat("assets/render_test.rs"), Category::Test);
        // index.css matches asset before skeleton.
        assert_eq!(cat("styles/index.css"), Category::Asset);
    }

    #[test]
    fn test_classification_is_total() {
        // No path panics; anything unmatched is a feature.
        assert_eq!(cat(""), Category::Feature);
        assert_eq!(cat("weird/ñame.xyz"), Category::Feature);
    }
}
