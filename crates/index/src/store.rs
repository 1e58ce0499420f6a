use std::cmp::Ordering;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use rayon::prelude::*;
use tracing::{debug, info};

use cvmatch_core::{
    cosine, ChunkConfig, Chunker, EmbeddingClient, MatchError, PiiDetector, RegexPiiDetector,
    Result,
};

use crate::record::{ChunkHit, EmbeddedChunk, JobMatch, JobRecord, ResumePage, ResumeRecord};

/// In-memory, append-only index over resumes and jobs for the lifetime of
/// the process. Owns every record; ranking operations read a snapshot and
/// never observe a partially ingested resume.
pub struct DocumentIndex {
    embeddings: EmbeddingClient,
    detector: Box<dyn PiiDetector>,
    chunker: Chunker,
    resumes: RwLock<Vec<Arc<ResumeRecord>>>,
    jobs: RwLock<Vec<Arc<JobRecord>>>,
    resume_seq: AtomicU64,
    job_seq: AtomicU64,
}

impl DocumentIndex {
    pub fn new(embeddings: EmbeddingClient) -> Self {
        Self::with_detector(embeddings, Box::new(RegexPiiDetector))
    }

    pub fn with_detector(embeddings: EmbeddingClient, detector: Box<dyn PiiDetector>) -> Self {
        Self {
            embeddings,
            detector,
            chunker: Chunker::new(ChunkConfig::default()),
            resumes: RwLock::new(Vec::new()),
            jobs: RwLock::new(Vec::new()),
            resume_seq: AtomicU64::new(0),
            job_seq: AtomicU64::new(0),
        }
    }

    /// Single ingestion path: extract PII, chunk, embed every chunk, then
    /// publish the fully-built record. All-or-nothing per call; an embedding
    /// failure propagates and nothing is stored. Embedding happens before the
    /// write lock is taken so a blocking remote call never stalls readers.
    pub fn add_resume(
        &self,
        owner_id: &str,
        filename: &str,
        mime: &str,
        text: &str,
    ) -> Result<Arc<ResumeRecord>> {
        let pii = self.detector.extract(text);
        let mut chunks = Vec::new();
        for chunk in self.chunker.chunk_text(text) {
            let embedding = self.embeddings.embed(&chunk.text)?;
            chunks.push(EmbeddedChunk {
                id: chunk.id,
                start: chunk.start,
                end: chunk.end,
                text: chunk.text,
                embedding,
            });
        }
        let created_at_ms = Utc::now().timestamp_millis();
        // id assignment and publication happen under one write lock so ids
        // stay insertion-ordered and readers see pre- or post-ingest state only
        let mut resumes = self.resumes.write();
        let id = format!("res_{}", self.resume_seq.fetch_add(1, AtomicOrdering::SeqCst));
        let record = Arc::new(ResumeRecord {
            id: id.clone(),
            owner_id: owner_id.to_string(),
            filename: filename.to_string(),
            mime: mime.to_string(),
            text: text.to_string(),
            chunks,
            pii,
            created_at_ms,
        });
        resumes.push(Arc::clone(&record));
        drop(resumes);
        info!(resume = %id, chunks = record.chunks.len(), "resume ingested");
        Ok(record)
    }

    /// Owner-scoped listing with an optional case-insensitive substring
    /// filter over the full text. Substring matching only; not semantic.
    pub fn list_resumes(
        &self,
        owner_id: &str,
        query: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> ResumePage {
        let needle = query.map(|q| q.to_lowercase());
        let resumes = self.resumes.read();
        let filtered: Vec<&Arc<ResumeRecord>> = resumes
            .iter()
            .filter(|r| r.owner_id == owner_id)
            .filter(|r| match &needle {
                Some(q) => r.text.to_lowercase().contains(q.as_str()),
                None => true,
            })
            .collect();
        let total = filtered.len();
        let start = offset.min(total);
        let end = offset.saturating_add(limit).min(total);
        let items = filtered[start..end]
            .iter()
            .map(|r| r.as_ref().clone())
            .collect();
        ResumePage { total, items }
    }

    /// Exact-id lookup. Ownership checks belong to the caller's boundary.
    pub fn get_resume(&self, id: &str) -> Option<Arc<ResumeRecord>> {
        self.resumes.read().iter().find(|r| r.id == id).cloned()
    }

    pub fn get_job(&self, id: &str) -> Option<Arc<JobRecord>> {
        self.jobs.read().iter().find(|j| j.id == id).cloned()
    }

    /// Lookup that turns a miss into an explicit not-found signal, for
    /// callers that treat a missing id as an error rather than an empty
    /// result.
    pub fn require_resume(&self, id: &str) -> Result<Arc<ResumeRecord>> {
        self.get_resume(id)
            .ok_or_else(|| MatchError::NotFound(format!("resume {id}")))
    }

    /// Stores the job verbatim. Requirements are embedded lazily at match
    /// time, never here.
    pub fn add_job(
        &self,
        owner_id: &str,
        title: &str,
        description: &str,
        requirements: Vec<String>,
    ) -> Arc<JobRecord> {
        let created_at_ms = Utc::now().timestamp_millis();
        let mut jobs = self.jobs.write();
        let id = format!("job_{}", self.job_seq.fetch_add(1, AtomicOrdering::SeqCst));
        let record = Arc::new(JobRecord {
            id: id.clone(),
            owner_id: owner_id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            requirements,
            created_at_ms,
        });
        jobs.push(Arc::clone(&record));
        drop(jobs);
        info!(job = %id, "job stored");
        record
    }

    /// Ranks every stored resume against a job's requirements. A resume's
    /// score is the maximum cosine between any of its chunks and any
    /// requirement embedding, floored at zero, so a job with no requirements
    /// (or a resume with no chunks) scores 0. An unknown job id yields an
    /// empty list; the boundary layer decides whether that is an error.
    pub fn match_job(&self, job_id: &str, top_n: usize) -> Result<Vec<JobMatch>> {
        let job = match self.get_job(job_id) {
            Some(job) => job,
            None => return Ok(Vec::new()),
        };
        let mut requirement_embeddings = Vec::with_capacity(job.requirements.len());
        for requirement in &job.requirements {
            requirement_embeddings.push(self.embeddings.embed(requirement)?);
        }
        let snapshot: Vec<Arc<ResumeRecord>> = self.resumes.read().clone();
        debug!(job = %job_id, resumes = snapshot.len(), "scoring job match");
        let mut scored: Vec<JobMatch> = snapshot
            .par_iter()
            .map(|resume| {
                let mut best = 0.0f32;
                for chunk in &resume.chunks {
                    for requirement in &requirement_embeddings {
                        let score = cosine(&chunk.embedding, requirement)?;
                        if score > best {
                            best = score;
                        }
                    }
                }
                Ok(JobMatch {
                    resume_id: resume.id.clone(),
                    score: best,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.resume_id.cmp(&b.resume_id))
        });
        scored.truncate(top_n);
        Ok(scored)
    }

    /// Scores every chunk of every resume against a free-text query and
    /// returns the top `k` chunk hits. Not deduplicated by resume: one
    /// resume may appear several times when several of its chunks rank.
    pub fn ask(&self, query: &str, k: usize) -> Result<Vec<ChunkHit>> {
        let query_embedding = self.embeddings.embed(query)?;
        let snapshot: Vec<Arc<ResumeRecord>> = self.resumes.read().clone();
        debug!(resumes = snapshot.len(), k, "scoring query");
        let per_resume: Vec<Vec<ScoredChunk>> = snapshot
            .par_iter()
            .map(|resume| {
                let mut hits = Vec::with_capacity(resume.chunks.len());
                for chunk in &resume.chunks {
                    hits.push(ScoredChunk {
                        resume_id: resume.id.clone(),
                        chunk_id: chunk.id.clone(),
                        text: chunk.text.clone(),
                        score: cosine(&query_embedding, &chunk.embedding)?,
                    });
                }
                Ok(hits)
            })
            .collect::<Result<Vec<_>>>()?;
        let mut ranked: Vec<ScoredChunk> = per_resume.into_iter().flatten().collect();
        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.chunk_id.cmp(&b.chunk_id))
                .then_with(|| a.resume_id.cmp(&b.resume_id))
        });
        ranked.truncate(k);
        Ok(ranked
            .into_iter()
            .map(|hit| ChunkHit {
                resume_id: hit.resume_id,
                text: hit.text,
                score: hit.score,
            })
            .collect())
    }
}

struct ScoredChunk {
    resume_id: String,
    chunk_id: String,
    text: String,
    score: f32,
}
