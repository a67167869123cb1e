//! Built-in molecule definitions.
//!
//! Step bodies are stored verbatim; `Molecule::description()` reproduces the
//! exact text blob these templates have always been seeded with.

use crate::model::molecule::{Molecule, MoleculeValidationError};
use crate::model::step::{Step, Tier};

pub const ENGINEER_IN_BOX_ID: &str = "mol-engineer-in-box";
pub const QUICK_FIX_ID: &str = "mol-quick-fix";
pub const RESEARCH_ID: &str = "mol-research";
pub const INSTALL_GO_BINARY_ID: &str = "mol-install-go-binary";
pub const BOOTSTRAP_GAS_TOWN_ID: &str = "mol-bootstrap";

type DefinitionResult = Result<Molecule, MoleculeValidationError>;

/// Full workflow from design to merge.
pub fn engineer_in_box() -> DefinitionResult {
    Molecule::new(
        ENGINEER_IN_BOX_ID,
        "Engineer in a Box",
        "Full workflow from design to merge.",
        vec![
            Step::new(
                "design",
                r#"Think carefully about architecture. Consider:
- Existing patterns in the codebase
- Trade-offs between approaches
- Testability and maintainability

Write a brief design summary before proceeding."#,
            ),
            Step::new("implement", "Write the code. Follow codebase conventions.")
                .with_needs(["design"]),
            Step::new(
                "review",
                r#"Self-review the changes. Look for:
- Bugs and edge cases
- Style issues
- Missing error handling"#,
            )
            .with_needs(["implement"]),
            Step::new(
                "test",
                r#"Write and run tests. Cover happy path and edge cases.
Fix any failures before proceeding."#,
            )
            .with_needs(["implement"]),
            Step::new("submit", "Submit for merge via refinery.").with_needs(["review", "test"]),
        ],
    )
}

/// Fast path for small changes.
pub fn quick_fix() -> DefinitionResult {
    Molecule::new(
        QUICK_FIX_ID,
        "Quick Fix",
        "Fast path for small changes.",
        vec![
            Step::new("implement", "Make the fix. Keep it focused."),
            Step::new("test", "Run relevant tests. Fix any regressions.").with_needs(["implement"]),
            Step::new("submit", "Submit for merge.").with_needs(["test"]),
        ],
    )
}

pub fn research() -> DefinitionResult {
    Molecule::new(
        RESEARCH_ID,
        "Research",
        "Investigation workflow.",
        vec![
            Step::new(
                "investigate",
                r#"Explore the question. Search code, read docs,
understand context. Take notes."#,
            ),
            Step::new(
                "document",
                r#"Write up findings. Include:
- What you learned
- Recommendations
- Open questions"#,
            )
            .with_needs(["investigate"]),
        ],
    )
}

/// Single step to rebuild and install the `gt` binary after code changes.
pub fn install_go_binary() -> DefinitionResult {
    Molecule::new(
        INSTALL_GO_BINARY_ID,
        "Install Go Binary",
        "Single step to rebuild and install the gt binary after code changes.",
        vec![Step::new(
            "install",
            r#"Build and install the gt binary locally.

Run from the rig directory:
```
go build -o gt ./cmd/gt
go install ./cmd/gt
```

Verify the installed binary is updated:
```
which gt
gt --version  # if version command exists
```"#,
        )],
    )
}

/// Walks a user through a fresh Gas Town installation after `brew install`.
pub fn bootstrap_gas_town() -> DefinitionResult {
    Molecule::new(
        BOOTSTRAP_GAS_TOWN_ID,
        "Bootstrap Gas Town",
        r#"Complete setup of a new Gas Town installation.

Run this after installing gt and bd via Homebrew. This molecule guides you through
creating a harness, setting up rigs, and configuring your environment."#,
        vec![
            Step::new(
                "locate-harness",
                r#"Determine where to install the Gas Town harness.

Ask the user for their preferred location. Common choices:
- ~/gt (recommended - short, easy to type)
- ~/gastown
- ~/workspace/gt

Validate the path:
- Must not already exist (or be empty)
- Parent directory must be writable
- Avoid paths with spaces

Store the chosen path for subsequent steps."#,
            ),
            Step::new(
                "create-harness",
                r#"Create the harness directory structure.

```bash
mkdir -p {{harness_path}}
cd {{harness_path}}
gt install . --name {{harness_name}}
```

If the user wants to track the harness in git:
```bash
gt git-init --github={{github_repo}} --private
```

The harness now has:
- mayor/ directory
- .beads/ for town-level tracking
- CLAUDE.md for mayor context
"#,
            )
            .with_needs(["locate-harness"]),
            Step::new(
                "setup-rigs",
                r#"Configure which rigs to add to the harness.

Default rigs for Gas Town development:
- gastown (git@github.com:steveyegge/gastown.git)
- beads (git@github.com:steveyegge/beads.git)

For each rig, run:
```bash
gt rig add <name> <git-url> --prefix <prefix>
```

This creates the full rig structure:
- refinery/rig/ (canonical main clone)
- mayor/rig/ (mayor's working clone)
- crew/main/ (default human workspace)
- witness/ (polecat monitor)
- polecats/ (worker directory)
"#,
            )
            .with_needs(["create-harness"]),
            Step::new(
                "build-gt",
                r#"Build the gt binary from source.

```bash
cd {{harness_path}}/gastown/mayor/rig
go build -o gt ./cmd/gt
```

Verify the build succeeded:
```bash
./gt version
```
"#,
            )
            .with_needs(["setup-rigs"])
            .with_tier(Tier::Haiku),
            Step::new(
                "install-paths",
                r#"Install gt to a location in PATH.

Check if ~/bin or ~/.local/bin is in PATH:
```bash
echo $PATH | tr ':' '\n' | grep -E '(~/bin|~/.local/bin|/home/.*/bin)'
```

Copy the binary:
```bash
mkdir -p ~/bin
cp {{harness_path}}/gastown/mayor/rig/gt ~/bin/gt
```

If ~/bin is not in PATH, add to shell config:
```bash
echo 'export PATH="$HOME/bin:$PATH"' >> ~/.zshrc
# or ~/.bashrc for bash users
```

Verify:
```bash
which gt
gt version
```
"#,
            )
            .with_needs(["build-gt"])
            .with_tier(Tier::Haiku),
            Step::new(
                "init-beads",
                r#"Initialize beads databases in all clones.

For each rig's mayor clone:
```bash
cd {{harness_path}}/<rig>/mayor/rig
bd init --prefix <rig-prefix>
```

For the town-level beads:
```bash
cd {{harness_path}}
bd init --prefix gm
```

Configure sync-branch for multi-clone setups:
```bash
echo "sync-branch: beads-sync" >> .beads/config.yaml
```
"#,
            )
            .with_needs(["setup-rigs"])
            .with_tier(Tier::Haiku),
            Step::new(
                "sync-beads",
                r#"Sync beads from remotes and fix any issues.

For each initialized beads database:
```bash
bd sync
bd doctor --fix
```

This imports existing issues from JSONL and sets up git hooks.
"#,
            )
            .with_needs(["init-beads"])
            .with_tier(Tier::Haiku),
            Step::new(
                "verify",
                r#"Verify the installation is complete and working.

Run health checks:
```bash
gt status          # Should show rigs with crew/refinery/mayor
gt doctor          # Check for issues
bd list            # Should show issues from synced beads
```

Test spawning capability (dry run):
```bash
gt spawn --help
```

Print summary:
- Harness location
- Installed rigs
- gt version
- bd version
"#,
            )
            .with_needs(["sync-beads", "install-paths"]),
        ],
    )
}
