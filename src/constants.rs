/// Constants module to avoid magic numbers in the codebase

// Thinking delays (milliseconds)
pub const DEFAULT_OPENING_ACK_MS: u64 = 1500;
pub const DEFAULT_ENTER_CLARIFYING_MS: u64 = 800;
pub const DEFAULT_ASK_QUESTION_MS: u64 = 500;
pub const DEFAULT_ANSWER_ACK_MS: u64 = 1000;
pub const DEFAULT_NEXT_QUESTION_MS: u64 = 600;
pub const DEFAULT_GENERATION_MS: u64 = 2500;

// Canned agent text
pub const OPENING_ACKNOWLEDGMENT: &str = "Great idea! I'd like to understand your vision better so I can create a comprehensive implementation plan. Let me ask a few clarifying questions.";
pub const READY_TO_GENERATE: &str =
    "Perfect! I have enough context now. Let me generate your implementation roadmap...";
pub const ANSWER_ACKNOWLEDGMENTS: &[&str] = &[
    "Got it, that helps!",
    "Thanks, that's useful context.",
    "Understood!",
    "Great, that gives me a clearer picture.",
];

// Demo repository shown when no workspace is scanned
pub const DEMO_REPO_NAME: &str = "acme/servicepro-app";

// Workspace scanning
pub const DEFAULT_MAX_CONTEXT_FILES: usize = 200;
pub const DEFAULT_EXCLUDE_DIRS: &[&str] = &[
    "node_modules",
    "target",
    "dist",
    "build",
    ".git",
    ".svn",
    ".hg",
    "venv",
    ".venv",
    "__pycache__",
    ".pytest_cache",
    ".mypy_cache",
    "vendor",
    ".idea",
    ".vscode",
    "coverage",
    ".gradle",
    ".cargo",
    ".next",
];

// UI Configuration
pub const UI_REFRESH_INTERVAL_MS: u64 = 50;
