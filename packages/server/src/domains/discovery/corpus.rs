//! The search-query corpus for discovery runs.
//!
//! Queries are grouped into strategy buckets (directory sweeps across
//! languages, launch/news sources, category sweeps, keyword patterns, startup
//! sources, "AI-powered service" sweeps). Each run concatenates all buckets
//! plus a few date-dynamic queries, shuffles, and truncates to the batch
//! size, so coverage varies between runs.

use chrono::{DateTime, Utc};

/// How many queries one discovery run processes.
pub const QUERY_BATCH_SIZE: usize = 60;

/// A named group of query strings sharing a search strategy.
#[derive(Debug, Clone)]
pub struct QueryBucket {
    pub strategy: &'static str,
    pub queries: &'static [&'static str],
}

/// The full corpus, as an explicit structure so it can be swapped in tests.
#[derive(Debug, Clone)]
pub struct QueryCorpus {
    buckets: Vec<QueryBucket>,
}

const DIRECTORY_SWEEPS: &[&str] = &[
    "new AI tools directory",
    "AI tools list updated",
    "neue KI-Tools Verzeichnis",
    "annuaire des outils IA nouveaux",
    "directorio de herramientas de inteligencia artificial nuevas",
    "diretório de novas ferramentas de IA",
    "elenco nuovi strumenti di intelligenza artificiale",
    "nieuwe AI-tools overzicht",
    "nya AI-verktyg katalog",
    "nowe narzędzia AI katalog",
    "yeni yapay zeka araçları listesi",
    "каталог новых нейросетей",
    "最新AI工具目录",
    "新しいAIツール一覧",
    "새로운 AI 도구 목록",
    "أحدث أدوات الذكاء الاصطناعي",
];

const LAUNCH_SOURCES: &[&str] = &[
    "Product Hunt AI tool launches this week",
    "Show HN new AI tool",
    "site:producthunt.com new AI app",
    "TechCrunch new AI startup launch",
    "BetaList AI startups",
    "There's An AI For That newest tools",
    "Futurepedia recently added AI tools",
    "FutureTools new listings",
    "Indie Hackers launched AI product",
    "AI tool launch announcement blog post",
];

const CATEGORY_SWEEPS: &[&str] = &[
    "AI image generation tools",
    "AI photo editing tools",
    "AI art generator websites",
    "AI logo design tools",
    "AI avatar generator apps",
    "AI headshot generator services",
    "AI interior design tools",
    "AI product photography tools",
    "AI background removal tools",
    "AI image upscaling services",
    "AI video editing tools",
    "AI video generation platforms",
    "text to video AI tools",
    "AI animation software",
    "AI subtitle generator tools",
    "AI video dubbing services",
    "AI short-form video tools",
    "AI music generation tools",
    "AI voice cloning software",
    "text to speech AI services",
    "speech to text AI tools",
    "AI podcast editing tools",
    "AI audio enhancement services",
    "AI chatbot builder platforms",
    "AI customer support chatbots",
    "AI personal assistant apps",
    "AI companion apps",
    "AI writing assistant tools",
    "AI copywriting software",
    "AI blog writing tools",
    "AI paraphrasing tools",
    "AI grammar checker apps",
    "AI email writing assistants",
    "AI resume builder tools",
    "AI cover letter generators",
    "AI story writing tools",
    "AI screenwriting software",
    "AI coding assistant tools",
    "AI code review tools",
    "AI code generation platforms",
    "AI SQL query generators",
    "AI regex generator tools",
    "AI API testing tools",
    "AI developer productivity tools",
    "no-code AI app builders",
    "AI workflow automation tools",
    "AI meeting notes tools",
    "AI note taking apps",
    "AI task management tools",
    "AI scheduling assistant apps",
    "AI presentation maker tools",
    "AI spreadsheet assistants",
    "AI document summarizer tools",
    "chat with PDF AI tools",
    "AI knowledge base software",
    "AI search engine tools",
    "AI marketing automation platforms",
    "AI SEO optimization tools",
    "AI ad creative generators",
    "AI social media management tools",
    "AI content calendar tools",
    "AI influencer marketing platforms",
    "AI email marketing tools",
    "AI landing page builders",
    "AI sales outreach tools",
    "AI lead generation software",
    "AI CRM assistants",
    "AI market research tools",
    "AI survey analysis tools",
    "AI customer feedback analysis",
    "AI business intelligence tools",
    "AI financial analysis software",
    "AI accounting automation tools",
    "AI invoice processing services",
    "AI legal document review tools",
    "AI contract analysis software",
    "AI recruiting tools",
    "AI candidate screening software",
    "AI e-learning platforms",
    "AI language learning apps",
    "AI math tutor apps",
    "AI flashcard generator tools",
    "AI course creation platforms",
    "AI research assistant tools",
    "AI literature review tools",
    "AI academic writing assistants",
    "AI data extraction tools",
    "AI web scraping services",
    "AI translation software",
    "AI localization platforms",
    "AI 3D model generators",
    "AI texture generation tools",
    "AI CAD assistant software",
    "AI game asset generators",
    "AI fashion design tools",
    "AI real estate listing tools",
    "AI travel planning apps",
];

const KEYWORD_PATTERNS: &[&str] = &[
    "\"AI-powered\" new tool launch",
    "\"built with GPT\" product",
    "\"AI copilot for\" SaaS",
    "\"powered by artificial intelligence\" app launch",
    "new .ai domain startup",
    "\"AI agent\" platform launch",
    "\"AI generator\" website new",
    "open source AI tool release",
    "machine learning SaaS product launch",
    "\"introducing\" AI assistant product",
    "GPT wrapper app launch",
    "LLM-based productivity tool",
];

const STARTUP_SOURCES: &[&str] = &[
    "Y Combinator latest batch AI startups",
    "AI startup seed round announcement",
    "Crunchbase newly founded AI companies",
    "AI startup pre-seed funding news",
    "Techstars AI accelerator companies",
    "AI company stealth launch announcement",
    "AI startup Series A announcement",
    "angel-backed AI startup launch",
];

const AI_POWERED_SERVICE_SWEEPS: &[&str] = &[
    "AI-powered customer support software",
    "AI-powered email client",
    "AI-powered CRM platform",
    "AI-powered photo storage service",
    "AI-powered hiring platform",
    "AI-powered travel booking service",
    "AI-powered fitness app",
    "AI-powered personal finance app",
    "AI-powered education platform",
    "AI-powered ecommerce personalization",
    "AI-powered cybersecurity service",
    "AI-powered healthcare documentation service",
];

impl QueryCorpus {
    /// The built-in corpus shipped with the service.
    pub fn builtin() -> Self {
        Self {
            buckets: vec![
                QueryBucket { strategy: "directory-sweep", queries: DIRECTORY_SWEEPS },
                QueryBucket { strategy: "launch-source", queries: LAUNCH_SOURCES },
                QueryBucket { strategy: "category-sweep", queries: CATEGORY_SWEEPS },
                QueryBucket { strategy: "keyword-pattern", queries: KEYWORD_PATTERNS },
                QueryBucket { strategy: "startup-source", queries: STARTUP_SOURCES },
                QueryBucket { strategy: "ai-powered-sweep", queries: AI_POWERED_SERVICE_SWEEPS },
            ],
        }
    }

    /// Build a corpus from explicit buckets (tests, experiments).
    pub fn from_buckets(buckets: Vec<QueryBucket>) -> Self {
        Self { buckets }
    }

    pub fn buckets(&self) -> &[QueryBucket] {
        &self.buckets
    }

    /// Total number of static queries across all buckets.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(|b| b.queries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Queries that only make sense relative to the current date.
    fn date_dynamic(now: DateTime<Utc>) -> Vec<String> {
        let month_year = now.format("%B %Y");
        let year = now.format("%Y");
        vec![
            format!("new AI tools launched {}", month_year),
            format!("AI tools released {}", month_year),
            format!("best new AI startups {}", month_year),
            format!("Product Hunt AI launches {}", month_year),
            format!("{} new AI tools directory", year),
        ]
    }

    /// Sample a batch of `n` queries for one run.
    ///
    /// All buckets plus the date-dynamic queries are shuffled with an
    /// unbiased Fisher-Yates permutation and truncated. Randomized order is
    /// intentional so successive runs cover different corners of the corpus.
    pub fn sample(&self, now: DateTime<Utc>, n: usize) -> Vec<String> {
        let mut all: Vec<String> = self
            .buckets
            .iter()
            .flat_map(|bucket| bucket.queries.iter().map(|q| q.to_string()))
            .collect();
        all.extend(Self::date_dynamic(now));

        fastrand::shuffle(&mut all);
        all.truncate(n);
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn sample_is_bounded_and_unique_within_call() {
        let corpus = QueryCorpus::builtin();
        let sample = corpus.sample(Utc::now(), QUERY_BATCH_SIZE);

        assert_eq!(sample.len(), QUERY_BATCH_SIZE);
        let unique: HashSet<&str> = sample.iter().map(|s| s.as_str()).collect();
        assert_eq!(unique.len(), sample.len());
    }

    #[test]
    fn sample_larger_than_corpus_returns_everything() {
        let corpus = QueryCorpus::from_buckets(vec![QueryBucket {
            strategy: "test",
            queries: &["a", "b", "c"],
        }]);
        // 3 static + 5 date-dynamic
        let sample = corpus.sample(Utc::now(), 1000);
        assert_eq!(sample.len(), 8);
    }

    #[test]
    fn builtin_corpus_is_larger_than_a_batch() {
        let corpus = QueryCorpus::builtin();
        assert!(corpus.len() > QUERY_BATCH_SIZE);
    }

    #[test]
    fn builtin_queries_are_distinct() {
        let corpus = QueryCorpus::builtin();
        let all: Vec<&str> = corpus
            .buckets()
            .iter()
            .flat_map(|b| b.queries.iter().copied())
            .collect();
        let unique: HashSet<&str> = all.iter().copied().collect();
        assert_eq!(unique.len(), all.len());
    }

    #[test]
    fn date_dynamic_queries_mention_the_current_month() {
        let now = Utc::now();
        let month = now.format("%B").to_string();
        let queries = QueryCorpus::date_dynamic(now);
        assert!(queries.iter().any(|q| q.contains(&month)));
    }
}
