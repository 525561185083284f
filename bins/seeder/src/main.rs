//! Development seeder: loads a standard water-utility chart of accounts and
//! the default cost-category mappings used for depreciation posting.
//!
//! Safe to run repeatedly; existing codes are skipped.

use std::collections::HashMap;

use tracing::{info, warn};
use uuid::Uuid;

use tirta_core::account::{AccountType, NormalBalance};
use tirta_core::category::CategoryKind;
use tirta_db::repositories::account::{AccountError, AccountRepository, CreateAccountInput};
use tirta_db::repositories::category::{
    CategoryError, CategoryRepository, CreateCategoryInput,
};

struct AccountSeed {
    code: &'static str,
    name: &'static str,
    account_type: AccountType,
    parent_code: Option<&'static str>,
}

const ACCOUNTS: &[AccountSeed] = &[
    AccountSeed { code: "1", name: "Aset", account_type: AccountType::Asset, parent_code: None },
    AccountSeed { code: "11", name: "Aset Lancar", account_type: AccountType::Asset, parent_code: Some("1") },
    AccountSeed { code: "1101", name: "Kas", account_type: AccountType::Asset, parent_code: Some("11") },
    AccountSeed { code: "1102", name: "Bank", account_type: AccountType::Asset, parent_code: Some("11") },
    AccountSeed { code: "1103", name: "Piutang Rekening Air", account_type: AccountType::Asset, parent_code: Some("11") },
    AccountSeed { code: "12", name: "Aset Tetap", account_type: AccountType::Asset, parent_code: Some("1") },
    AccountSeed { code: "1201", name: "Tanah", account_type: AccountType::Asset, parent_code: Some("12") },
    AccountSeed { code: "1202", name: "Instalasi Sumber Air", account_type: AccountType::Asset, parent_code: Some("12") },
    AccountSeed { code: "1203", name: "Jaringan Pipa Transmisi & Distribusi", account_type: AccountType::Asset, parent_code: Some("12") },
    AccountSeed { code: "1204", name: "Bangunan", account_type: AccountType::Asset, parent_code: Some("12") },
    AccountSeed { code: "1205", name: "Kendaraan", account_type: AccountType::Asset, parent_code: Some("12") },
    AccountSeed { code: "1206", name: "Inventaris Kantor", account_type: AccountType::Asset, parent_code: Some("12") },
    AccountSeed { code: "1209", name: "Akumulasi Penyusutan Aset Tetap", account_type: AccountType::ContraAsset, parent_code: Some("12") },
    AccountSeed { code: "2", name: "Kewajiban", account_type: AccountType::Liability, parent_code: None },
    AccountSeed { code: "2101", name: "Hutang Usaha", account_type: AccountType::Liability, parent_code: Some("2") },
    AccountSeed { code: "3", name: "Ekuitas", account_type: AccountType::Equity, parent_code: None },
    AccountSeed { code: "3101", name: "Modal Pemerintah Daerah", account_type: AccountType::Equity, parent_code: Some("3") },
    AccountSeed { code: "4", name: "Pendapatan", account_type: AccountType::Revenue, parent_code: None },
    AccountSeed { code: "4101", name: "Pendapatan Penjualan Air", account_type: AccountType::Revenue, parent_code: Some("4") },
    AccountSeed { code: "4102", name: "Pendapatan Non Air", account_type: AccountType::Revenue, parent_code: Some("4") },
    AccountSeed { code: "4901", name: "Potongan Pendapatan", account_type: AccountType::ContraRevenue, parent_code: Some("4") },
    AccountSeed { code: "5", name: "Biaya", account_type: AccountType::Expense, parent_code: None },
    AccountSeed { code: "5101", name: "Beban Penyusutan Aset Tetap", account_type: AccountType::Expense, parent_code: Some("5") },
    AccountSeed { code: "5102", name: "Beban Pemeliharaan", account_type: AccountType::Expense, parent_code: Some("5") },
    AccountSeed { code: "5103", name: "Beban Operasi Sumber & Pengolahan", account_type: AccountType::Expense, parent_code: Some("5") },
];

struct CategorySeed {
    code: &'static str,
    name: &'static str,
    kind: CategoryKind,
    debit_code: Option<&'static str>,
    credit_code: Option<&'static str>,
}

const CATEGORIES: &[CategorySeed] = &[
    CategorySeed {
        code: "B-PNY",
        name: "Beban Penyusutan",
        kind: CategoryKind::Biaya,
        debit_code: Some("5101"),
        credit_code: None,
    },
    CategorySeed {
        code: "A-AKM",
        name: "Akumulasi Penyusutan",
        kind: CategoryKind::Aset,
        debit_code: None,
        credit_code: Some("1209"),
    },
    CategorySeed {
        code: "B-PML",
        name: "Beban Pemeliharaan",
        kind: CategoryKind::Biaya,
        debit_code: Some("5102"),
        credit_code: Some("1101"),
    },
    CategorySeed {
        code: "P-AIR",
        name: "Pendapatan Air",
        kind: CategoryKind::Pendapatan,
        debit_code: Some("1103"),
        credit_code: Some("4101"),
    },
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set to run the seeder");
    let db = tirta_db::connect(&database_url).await?;

    let account_repo = AccountRepository::new(db.clone());
    let category_repo = CategoryRepository::new(db);

    let mut ids_by_code: HashMap<&'static str, Uuid> = HashMap::new();

    for seed in ACCOUNTS {
        let parent_id = seed.parent_code.and_then(|code| ids_by_code.get(code).copied());
        let input = CreateAccountInput {
            code: seed.code.to_string(),
            name: seed.name.to_string(),
            account_type: seed.account_type,
            normal_balance: seed.account_type.default_normal_balance(),
            parent_id,
            is_active: true,
        };

        match account_repo.create_account(input).await {
            Ok(account) => {
                ids_by_code.insert(seed.code, account.id);
                info!(code = seed.code, "Seeded account");
            }
            Err(AccountError::DuplicateCode(_)) => {
                if let Some(existing) = find_account_id(&account_repo, seed.code).await? {
                    ids_by_code.insert(seed.code, existing);
                }
                warn!(code = seed.code, "Account already exists, skipped");
            }
            Err(e) => return Err(e.into()),
        }
    }

    for seed in CATEGORIES {
        let input = CreateCategoryInput {
            code: seed.code.to_string(),
            name: seed.name.to_string(),
            kind: seed.kind,
            debit_account_id: seed.debit_code.and_then(|c| ids_by_code.get(c).copied()),
            credit_account_id: seed.credit_code.and_then(|c| ids_by_code.get(c).copied()),
        };

        match category_repo.create_category(input).await {
            Ok(_) => info!(code = seed.code, "Seeded cost category"),
            Err(CategoryError::DuplicateCode(_)) => {
                warn!(code = seed.code, "Cost category already exists, skipped");
            }
            Err(e) => return Err(e.into()),
        }
    }

    info!("Seeding complete");
    Ok(())
}

async fn find_account_id(
    repo: &AccountRepository,
    code: &str,
) -> anyhow::Result<Option<Uuid>> {
    use tirta_db::repositories::account::AccountFilter;

    let accounts = repo
        .list_accounts(AccountFilter {
            q: Some(code.to_string()),
            ..AccountFilter::default()
        })
        .await?;
    Ok(accounts.into_iter().find(|a| a.code == code).map(|a| a.id))
}
