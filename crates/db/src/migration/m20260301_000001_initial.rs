//! Initial database migration.
//!
//! Creates the enums, tables, indexes, and constraints for the fixed-asset
//! accounting core.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: CHART OF ACCOUNTS & COST CATEGORIES
        // ============================================================
        db.execute_unprepared(ACCOUNTS_SQL).await?;
        db.execute_unprepared(COST_CATEGORIES_SQL).await?;

        // ============================================================
        // PART 3: ASSETS & DEPRECIATION SCHEDULE
        // ============================================================
        db.execute_unprepared(ASSETS_SQL).await?;
        db.execute_unprepared(DEPRECIATION_ENTRIES_SQL).await?;

        // ============================================================
        // PART 4: JOURNAL & LEDGER LINES
        // ============================================================
        db.execute_unprepared(JOURNALS_SQL).await?;
        db.execute_unprepared(JOURNAL_LINES_SQL).await?;

        // ============================================================
        // PART 5: SEQUENCE COUNTERS
        // ============================================================
        db.execute_unprepared(SEQUENCE_COUNTERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Account types (contra types net against their parent category)
CREATE TYPE account_type AS ENUM (
    'asset',
    'liability',
    'equity',
    'revenue',
    'expense',
    'contra_asset',
    'contra_revenue'
);

-- Normal balance side
CREATE TYPE normal_balance AS ENUM ('debit', 'credit');

-- Cost category kinds
CREATE TYPE category_kind AS ENUM ('BIAYA', 'PENDAPATAN', 'ASET');

-- Asset categories (LAND never depreciates)
CREATE TYPE asset_category AS ENUM (
    'LAND',
    'BUILDING',
    'PIPELINE',
    'MACHINERY',
    'VEHICLE',
    'OFFICE_EQUIPMENT'
);

-- Depreciation method
CREATE TYPE depreciation_method AS ENUM ('STRAIGHT_LINE', 'DECLINING_BALANCE');

-- Depreciation basis
CREATE TYPE depreciation_basis AS ENUM ('MONTHLY', 'YEARLY');

-- Declining-balance rate classes
CREATE TYPE depreciation_class AS ENUM (
    'GROUP_1',
    'GROUP_2',
    'GROUP_3',
    'GROUP_4',
    'BUILDING_PERMANENT'
);
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id UUID PRIMARY KEY,
    code VARCHAR(20) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    account_type account_type NOT NULL,
    normal_balance normal_balance NOT NULL,
    parent_id UUID REFERENCES accounts(id) ON DELETE SET NULL,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_accounts_parent ON accounts(parent_id);
CREATE INDEX idx_accounts_type ON accounts(account_type);
";

const COST_CATEGORIES_SQL: &str = r"
CREATE TABLE cost_categories (
    id UUID PRIMARY KEY,
    code VARCHAR(20) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    kind category_kind NOT NULL,
    debit_account_id UUID REFERENCES accounts(id) ON DELETE RESTRICT,
    credit_account_id UUID REFERENCES accounts(id) ON DELETE RESTRICT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const ASSETS_SQL: &str = r"
CREATE TABLE assets (
    id UUID PRIMARY KEY,
    asset_number VARCHAR(30) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    category asset_category NOT NULL,
    acquisition_value NUMERIC(18, 2) NOT NULL,
    residual_value NUMERIC(18, 2) NOT NULL DEFAULT 0,
    useful_life_years INTEGER NOT NULL,
    depreciation_method depreciation_method NOT NULL,
    depreciation_class depreciation_class,
    depreciation_basis depreciation_basis NOT NULL DEFAULT 'YEARLY',
    depreciation_start_date DATE,
    commissioned_date DATE,
    registered_year INTEGER NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const DEPRECIATION_ENTRIES_SQL: &str = r"
CREATE TABLE depreciation_entries (
    id UUID PRIMARY KEY,
    asset_id UUID NOT NULL REFERENCES assets(id) ON DELETE CASCADE,
    period DATE NOT NULL,
    method depreciation_method NOT NULL,
    annual_rate NUMERIC(10, 6) NOT NULL,
    opening_value NUMERIC(18, 2) NOT NULL,
    expense NUMERIC(18, 2) NOT NULL,
    accumulated NUMERIC(18, 2) NOT NULL,
    closing_value NUMERIC(18, 2) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_depreciation_asset_period UNIQUE (asset_id, period)
);

CREATE INDEX idx_depreciation_asset ON depreciation_entries(asset_id);
";

const JOURNALS_SQL: &str = r"
CREATE TABLE journals (
    id UUID PRIMARY KEY,
    journal_date DATE NOT NULL,
    reference_no VARCHAR(50),
    voucher_no VARCHAR(50),
    description TEXT NOT NULL,
    source_tag VARCHAR(100) NOT NULL,
    print_count INTEGER NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_journals_date ON journals(journal_date);
CREATE INDEX idx_journals_source_tag ON journals(source_tag);
";

const JOURNAL_LINES_SQL: &str = r"
CREATE TABLE journal_lines (
    id UUID PRIMARY KEY,
    journal_id UUID NOT NULL REFERENCES journals(id) ON DELETE CASCADE,
    account_id UUID NOT NULL REFERENCES accounts(id) ON DELETE RESTRICT,
    cost_category_id UUID REFERENCES cost_categories(id) ON DELETE RESTRICT,
    source_tag VARCHAR(100),
    debit NUMERIC(18, 2) NOT NULL DEFAULT 0,
    credit NUMERIC(18, 2) NOT NULL DEFAULT 0,
    cost_unit_id UUID,
    asset_id UUID REFERENCES assets(id) ON DELETE SET NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_journal_lines_journal ON journal_lines(journal_id);
CREATE INDEX idx_journal_lines_account ON journal_lines(account_id);
CREATE INDEX idx_journal_lines_asset ON journal_lines(asset_id);

-- Backstop for idempotent posting: at most one line per (source, category).
CREATE UNIQUE INDEX uq_journal_lines_source_category
    ON journal_lines(source_tag, cost_category_id)
    WHERE source_tag IS NOT NULL AND cost_category_id IS NOT NULL;
";

const SEQUENCE_COUNTERS_SQL: &str = r"
CREATE TABLE sequence_counters (
    key VARCHAR(50) PRIMARY KEY,
    value BIGINT NOT NULL DEFAULT 0,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS sequence_counters;
DROP TABLE IF EXISTS journal_lines;
DROP TABLE IF EXISTS journals;
DROP TABLE IF EXISTS depreciation_entries;
DROP TABLE IF EXISTS assets;
DROP TABLE IF EXISTS cost_categories;
DROP TABLE IF EXISTS accounts;

DROP TYPE IF EXISTS depreciation_class;
DROP TYPE IF EXISTS depreciation_basis;
DROP TYPE IF EXISTS depreciation_method;
DROP TYPE IF EXISTS asset_category;
DROP TYPE IF EXISTS category_kind;
DROP TYPE IF EXISTS normal_balance;
DROP TYPE IF EXISTS account_type;
";
