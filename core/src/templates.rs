//! Built-in skill tree used to seed a fresh store.
//!
//! `update` replaces these files with the upstream repository; until
//! then they give `sync` something useful to distribute.

use std::fs;
use std::io;
use std::path::Path;

pub const SKILL_MD: &str = r#"---
name: modern-python
description: Conventions for modern Python projects built on uv, ruff and pytest
---

# Modern Python

Use this skill when creating or reworking a Python project.

## Core rules

1. Manage everything through `uv`: interpreters, dependencies, scripts.
2. One `pyproject.toml` is the single source of truth. No `setup.py`,
   no `requirements.txt`.
3. Lint and format with `ruff`, type-check with `ty`, test with `pytest`.
4. Keep the package under `src/`, tests under `tests/`.

## Reference

- `reference/project-structure.md` for the expected layout.
- `reference/quality-tools.md` for lint, format and type-check setup.
- `reference/testing.md` for the pytest conventions.
"#;

pub const PROJECT_STRUCTURE_MD: &str = r#"# Project structure

```
my-project/
├── pyproject.toml
├── uv.lock
├── README.md
├── src/
│   └── my_project/
│       ├── __init__.py
│       └── cli.py
└── tests/
    └── test_cli.py
```

- The import package lives under `src/` so tests run against the
  installed package, never the checkout.
- Entry points are declared in `[project.scripts]`, one function per
  command.
- `uv.lock` is committed; `uv sync` reproduces the environment.
"#;

pub const QUALITY_TOOLS_MD: &str = r#"# Quality tools

## ruff

```toml
[tool.ruff]
line-length = 100

[tool.ruff.lint]
select = ["E", "F", "I", "UP", "B"]
```

Run `uv run ruff format .` before every commit, `uv run ruff check .`
in CI.

## Type checking

Annotate all public functions. Run `uv run ty check` in CI and treat
errors as failures, not warnings.
"#;

pub const TESTING_MD: &str = r#"# Testing

- Tests live in `tests/`, named `test_*.py`, run with `uv run pytest`.
- Use `tmp_path` for anything that touches the filesystem.
- Prefer plain asserts over assertion helper methods.
- Parametrize with `pytest.mark.parametrize` instead of copying test
  bodies.
- A test that shells out to the network is a bug; fake the boundary.
"#;

/// Relative path and contents of every file in the built-in tree.
pub const DEFAULT_SKILL_FILES: &[(&str, &str)] = &[
    ("SKILL.md", SKILL_MD),
    ("reference/project-structure.md", PROJECT_STRUCTURE_MD),
    ("reference/quality-tools.md", QUALITY_TOOLS_MD),
    ("reference/testing.md", TESTING_MD),
];

/// Write the built-in tree under `dest`, returning how many files were
/// written.
pub fn write_default_tree(dest: &Path) -> io::Result<usize> {
    for (rel, contents) in DEFAULT_SKILL_FILES {
        let path = dest.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
    }
    Ok(DEFAULT_SKILL_FILES.len())
}
