use ozbooks_core::{AccountId, CategorizedTransaction, CategoryId, UserId};
use ozbooks_import::{parse_statement, BankRegistry, RuleSet};
use ozbooks_storage::{ensure_category, get_account, insert_transaction, DbPool, NewTransaction};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use crate::error::IngestError;
use crate::extract::TextExtractor;
use crate::hash::sha256_hex;

/// One uploaded statement file.
#[derive(Debug, Clone)]
pub struct Document {
    pub name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct UploadBatch {
    pub user_id: UserId,
    pub account_id: AccountId,
    /// Bank format id; unknown ids use the default format.
    pub bank: String,
    pub documents: Vec<Document>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum FileStatus {
    Imported { count: usize },
    /// `error_id` matches the id logged alongside the failure.
    Failed { error: String, error_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOutcome {
    pub name: String,
    pub sha256: String,
    #[serde(flatten)]
    pub status: FileStatus,
}

impl FileOutcome {
    pub fn is_imported(&self) -> bool {
        matches!(self.status, FileStatus::Imported { .. })
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestReport {
    /// Transactions committed across all files.
    pub count: usize,
    pub transactions: Vec<CategorizedTransaction>,
    pub files: Vec<FileOutcome>,
}

/// Orchestrates: validate → per file (hash → extract → parse → classify → ensure categories →
/// insert in one database transaction).
///
/// Files are independent. A failing file rolls back only its own transactions; categories it
/// created stay, since they are shared with later files.
pub struct IngestPipeline {
    pool: DbPool,
    banks: Arc<BankRegistry>,
    rules: Arc<RuleSet>,
    extractor: Arc<dyn TextExtractor>,
}

impl IngestPipeline {
    pub fn new(
        pool: DbPool,
        banks: Arc<BankRegistry>,
        rules: Arc<RuleSet>,
        extractor: Arc<dyn TextExtractor>,
    ) -> Self {
        Self {
            pool,
            banks,
            rules,
            extractor,
        }
    }

    pub async fn ingest(&self, batch: UploadBatch) -> Result<IngestReport, IngestError> {
        if batch.documents.is_empty() {
            return Err(IngestError::NoDocuments);
        }
        if get_account(&self.pool, &batch.account_id, &batch.user_id)
            .await?
            .is_none()
        {
            return Err(IngestError::UnknownAccount(batch.account_id));
        }

        let UploadBatch {
            user_id,
            account_id,
            bank,
            documents,
        } = batch;

        let mut report = IngestReport::default();
        let mut category_ids: HashMap<String, CategoryId> = HashMap::new();

        for doc in documents {
            let sha256 = sha256_hex(&doc.bytes);
            let name = doc.name.clone();
            let span = tracing::info_span!("ingest_file", file = %name, sha256 = %sha256);

            let result = self
                .ingest_document(&user_id, &account_id, &bank, &sha256, doc, &mut category_ids)
                .instrument(span.clone())
                .await;

            let _guard = span.enter();
            let status = match result {
                Ok(txs) => {
                    tracing::info!(count = txs.len(), "file imported");
                    let count = txs.len();
                    report.count += count;
                    report.transactions.extend(txs);
                    FileStatus::Imported { count }
                }
                Err(e) => {
                    let error_id = Uuid::new_v4().to_string();
                    tracing::error!(error_id = %error_id, error = %e, "file import failed");
                    let error = if e.is_client_error() {
                        e.to_string()
                    } else {
                        "Internal error while importing file".to_string()
                    };
                    FileStatus::Failed { error, error_id }
                }
            };
            report.files.push(FileOutcome {
                name,
                sha256,
                status,
            });
        }

        Ok(report)
    }

    async fn ingest_document(
        &self,
        user_id: &UserId,
        account_id: &AccountId,
        bank: &str,
        sha256: &str,
        doc: Document,
        category_ids: &mut HashMap<String, CategoryId>,
    ) -> Result<Vec<CategorizedTransaction>, IngestError> {
        let extractor = Arc::clone(&self.extractor);
        let bytes = doc.bytes;
        let text = tokio::task::spawn_blocking(move || extractor.extract(&bytes)).await??;

        let parsed = parse_statement(&text, bank, &self.banks);
        if parsed.is_empty() {
            tracing::warn!("no transactions recognised in file");
        }

        let mut categorized = Vec::with_capacity(parsed.len());
        for tx in parsed {
            let assignment = self.rules.classify_or_fallback(&tx.description);
            let category_id = match category_ids.get(&assignment.name) {
                Some(id) => *id,
                None => {
                    // Committed on its own so other files and callers can share it.
                    let category = ensure_category(&self.pool, &assignment.name, user_id).await?;
                    category_ids.insert(assignment.name.clone(), category.id);
                    category.id
                }
            };
            categorized.push(CategorizedTransaction::new(tx, category_id, assignment));
        }

        let mut db_tx = self.pool.begin().await?;
        for tx in &categorized {
            insert_transaction(
                &mut *db_tx,
                NewTransaction {
                    user_id,
                    account_id,
                    transaction: tx,
                    source_sha256: Some(sha256),
                },
            )
            .await?;
        }
        db_tx.commit().await?;

        Ok(categorized)
    }
}
