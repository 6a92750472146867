//! Database schema constants.
//!
//! All SQL schema definitions for the PostgreSQL storage backend.

/// SQL schema for creating the users table.
pub const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id UUID PRIMARY KEY,
    email VARCHAR(320) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    role VARCHAR(16) NOT NULL CHECK (role IN ('student', 'mentor', 'admin')),
    reliability_score DOUBLE PRECISION NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

/// SQL schema for creating the launch_packs table.
pub const CREATE_LAUNCH_PACKS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS launch_packs (
    id UUID PRIMARY KEY,
    slug VARCHAR(255) NOT NULL UNIQUE,
    title VARCHAR(255) NOT NULL,
    description TEXT NOT NULL,
    duration_weeks INTEGER NOT NULL CHECK (duration_weeks > 0),
    difficulty VARCHAR(32) NOT NULL,
    tags JSONB NOT NULL DEFAULT '[]'::jsonb
)
"#;

/// SQL schema for creating the milestones table.
pub const CREATE_MILESTONES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS milestones (
    id UUID PRIMARY KEY,
    launch_pack_id UUID NOT NULL REFERENCES launch_packs(id) ON DELETE CASCADE,
    title VARCHAR(255) NOT NULL,
    description TEXT NOT NULL,
    order_index INTEGER NOT NULL,
    estimated_hours DOUBLE PRECISION NOT NULL DEFAULT 0,
    UNIQUE(launch_pack_id, order_index)
)
"#;

/// SQL schema for creating the projects table.
pub const CREATE_PROJECTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS projects (
    id UUID PRIMARY KEY,
    owner_id UUID NOT NULL REFERENCES users(id),
    launch_pack_id UUID NOT NULL REFERENCES launch_packs(id),
    title VARCHAR(512) NOT NULL,
    short_summary TEXT NOT NULL,
    status VARCHAR(16) NOT NULL CHECK (status IN ('in_progress', 'in_review', 'verified')),
    progress_percent SMALLINT NOT NULL DEFAULT 0 CHECK (progress_percent BETWEEN 0 AND 100),
    public_slug VARCHAR(512) NOT NULL UNIQUE,
    started_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

/// SQL schema for creating the project_milestones table.
pub const CREATE_PROJECT_MILESTONES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS project_milestones (
    id UUID PRIMARY KEY,
    project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    milestone_id UUID NOT NULL REFERENCES milestones(id),
    completed BOOLEAN NOT NULL DEFAULT FALSE,
    completed_at TIMESTAMPTZ,
    notes TEXT NOT NULL DEFAULT '',
    UNIQUE(project_id, milestone_id)
)
"#;

/// SQL schema for creating the reviews table.
pub const CREATE_REVIEWS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS reviews (
    id UUID PRIMARY KEY,
    project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    mentor_id UUID NOT NULL REFERENCES users(id),
    meets_brief BOOLEAN NOT NULL DEFAULT FALSE,
    core_functional BOOLEAN NOT NULL DEFAULT FALSE,
    docs_ok BOOLEAN NOT NULL DEFAULT FALSE,
    demo_ok BOOLEAN NOT NULL DEFAULT FALSE,
    rating SMALLINT CHECK (rating BETWEEN 1 AND 5),
    comments TEXT NOT NULL DEFAULT '',
    verified BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    submitted_at TIMESTAMPTZ
)
"#;

/// SQL schema for creating the portfolios table.
pub const CREATE_PORTFOLIOS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS portfolios (
    id UUID PRIMARY KEY,
    project_id UUID NOT NULL UNIQUE REFERENCES projects(id) ON DELETE CASCADE,
    public_url VARCHAR(1024) NOT NULL,
    mentor_comment TEXT NOT NULL DEFAULT '',
    reliability_score_snapshot DOUBLE PRECISION NOT NULL DEFAULT 0,
    verified_badge BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

/// SQL schema for creating the ai_cache table.
pub const CREATE_AI_CACHE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS ai_cache (
    key VARCHAR(1024) PRIMARY KEY,
    prompt TEXT NOT NULL,
    response JSONB NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    ttl_ms BIGINT NOT NULL
)
"#;

/// Indexes as `(index name, statement)`.
pub const CREATE_INDEXES: [(&str, &str); 5] = [
    (
        "idx_milestones_launch_pack_id",
        "CREATE INDEX IF NOT EXISTS idx_milestones_launch_pack_id ON milestones(launch_pack_id)",
    ),
    (
        "idx_projects_owner_id",
        "CREATE INDEX IF NOT EXISTS idx_projects_owner_id ON projects(owner_id)",
    ),
    (
        "idx_project_milestones_project_id",
        "CREATE INDEX IF NOT EXISTS idx_project_milestones_project_id ON project_milestones(project_id)",
    ),
    (
        "idx_reviews_mentor_id",
        "CREATE INDEX IF NOT EXISTS idx_reviews_mentor_id ON reviews(mentor_id)",
    ),
    (
        "idx_reviews_project_id",
        "CREATE INDEX IF NOT EXISTS idx_reviews_project_id ON reviews(project_id)",
    ),
];

/// Table names in the schema.
pub mod tables {
    pub const AI_CACHE: &str = "ai_cache";
    pub const PORTFOLIOS: &str = "portfolios";
    pub const REVIEWS: &str = "reviews";
    pub const PROJECT_MILESTONES: &str = "project_milestones";
    pub const PROJECTS: &str = "projects";
    pub const MILESTONES: &str = "milestones";
    pub const LAUNCH_PACKS: &str = "launch_packs";
    pub const USERS: &str = "users";
}

/// One named, idempotent unit of the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaStep {
    pub name: String,
    pub sql: &'static str,
}

/// Every schema step in apply order: tables before the tables that
/// reference them, indexes last.
pub fn schema_steps() -> Vec<SchemaStep> {
    let creates = [
        (tables::USERS, CREATE_USERS_TABLE),
        (tables::LAUNCH_PACKS, CREATE_LAUNCH_PACKS_TABLE),
        (tables::MILESTONES, CREATE_MILESTONES_TABLE),
        (tables::PROJECTS, CREATE_PROJECTS_TABLE),
        (tables::PROJECT_MILESTONES, CREATE_PROJECT_MILESTONES_TABLE),
        (tables::REVIEWS, CREATE_REVIEWS_TABLE),
        (tables::PORTFOLIOS, CREATE_PORTFOLIOS_TABLE),
        (tables::AI_CACHE, CREATE_AI_CACHE_TABLE),
    ];

    creates
        .into_iter()
        .map(|(table, sql)| SchemaStep {
            name: format!("create_{}", table),
            sql,
        })
        .chain(CREATE_INDEXES.into_iter().map(|(index, sql)| SchemaStep {
            name: format!("create_{}", index),
            sql,
        }))
        .collect()
}
