// 文章瀏覽流程：去抖動搜尋、分頁、卡片展開。
// 擁有者負責把 channel 裡的事件餵回 `handle`，本身不開執行緒。

use crate::core::timer::TimerHandle;
use crate::core::{excerpt, Post, PostListing, PostPage, Result};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

/// 搜尋輸入停止後到送出查詢的安靜期
pub const SEARCH_QUIET_PERIOD: Duration = Duration::from_millis(400);

#[derive(Debug)]
pub enum BrowseEvent {
    /// 搜尋框每一次擊鍵
    SearchInput(String),
    DebounceElapsed { seq: u64 },
    /// 分頁列點擊（1 起算）
    PageSelected(u32),
    PageFetched { seq: u64, result: Result<PostPage> },
    ToggleExpand(i64),
}

/// 清單區塊的三態，互斥：載入中、錯誤、已載入
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowsePhase {
    Loading,
    Error(String),
    Loaded,
}

/// 單張卡片的呈現內容，由展開集合決定
#[derive(Debug, PartialEq)]
pub enum CardView<'a> {
    Collapsed {
        excerpt: String,
    },
    Expanded {
        content_html: &'a str,
        gallery: &'a [String],
    },
}

pub struct PostBrowser<G: PostListing + 'static> {
    gateway: Arc<G>,
    events: UnboundedSender<BrowseEvent>,
    quiet_period: Duration,
    posts: Vec<Post>,
    expanded: HashSet<i64>,
    search_input: String,
    search_term: String,
    page: u32,
    total_pages: u32,
    phase: BrowsePhase,
    debounce: Option<TimerHandle>,
    debounce_seq: u64,
    fetch_seq: u64,
}

impl<G: PostListing + 'static> PostBrowser<G> {
    pub fn new(gateway: Arc<G>, events: UnboundedSender<BrowseEvent>) -> Self {
        Self {
            gateway,
            events,
            quiet_period: SEARCH_QUIET_PERIOD,
            posts: Vec::new(),
            expanded: HashSet::new(),
            search_input: String::new(),
            search_term: String::new(),
            page: 1,
            total_pages: 1,
            phase: BrowsePhase::Loading,
            debounce: None,
            debounce_seq: 0,
            fetch_seq: 0,
        }
    }

    pub fn with_quiet_period(mut self, quiet_period: Duration) -> Self {
        self.quiet_period = quiet_period;
        self
    }

    /// 進場先抓第一頁（未過濾）
    pub fn start(&mut self) {
        self.issue_fetch();
    }

    pub fn handle(&mut self, event: BrowseEvent) {
        match event {
            BrowseEvent::SearchInput(text) => self.on_search_input(text),
            BrowseEvent::DebounceElapsed { seq } => self.on_debounce_elapsed(seq),
            BrowseEvent::PageSelected(page) => self.on_page_selected(page),
            BrowseEvent::PageFetched { seq, result } => self.on_page_fetched(seq, result),
            BrowseEvent::ToggleExpand(id) => self.on_toggle_expand(id),
        }
    }

    fn on_search_input(&mut self, text: String) {
        self.search_input = text;
        self.debounce_seq += 1;
        let events = self.events.clone();
        let seq = self.debounce_seq;
        // 替換舊的計時器就是取消它，安靜期從最後一鍵重新起算
        self.debounce = Some(TimerHandle::after(self.quiet_period, move || {
            let _ = events.send(BrowseEvent::DebounceElapsed { seq });
        }));
    }

    fn on_debounce_elapsed(&mut self, seq: u64) {
        if seq != self.debounce_seq {
            return;
        }
        self.debounce = None;
        if self.search_input == self.search_term {
            return;
        }
        self.search_term = self.search_input.clone();
        self.page = 1;
        self.issue_fetch();
    }

    fn on_page_selected(&mut self, page: u32) {
        if page == 0 || page == self.page {
            return;
        }
        self.page = page;
        self.issue_fetch();
    }

    fn on_page_fetched(&mut self, seq: u64, result: Result<PostPage>) {
        if seq != self.fetch_seq {
            tracing::debug!("📦 Discarding stale post page (seq {})", seq);
            return;
        }
        match result {
            Ok(page) => {
                self.posts = page.posts;
                self.total_pages = page.pages;
                self.phase = BrowsePhase::Loaded;
            }
            Err(e) => {
                tracing::warn!("❌ Post page fetch failed: {}", e);
                self.phase = BrowsePhase::Error(e.user_friendly_message());
            }
        }
    }

    fn on_toggle_expand(&mut self, id: i64) {
        if !self.expanded.remove(&id) {
            self.expanded.insert(id);
        }
    }

    fn issue_fetch(&mut self) {
        self.fetch_seq += 1;
        self.phase = BrowsePhase::Loading;
        tracing::debug!(
            "📡 Fetching posts (page {}, search {:?})",
            self.page,
            self.search_term
        );
        let gateway = Arc::clone(&self.gateway);
        let events = self.events.clone();
        let seq = self.fetch_seq;
        let page = self.page;
        let search = self.search_term.clone();
        tokio::spawn(async move {
            let result = gateway.fetch_page(page, &search).await;
            let _ = events.send(BrowseEvent::PageFetched { seq, result });
        });
    }

    pub fn phase(&self) -> &BrowsePhase {
        &self.phase
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// 搜尋框目前的文字（尚未送出）
    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    /// 最後一次真正送出查詢的關鍵字
    pub fn committed_search(&self) -> &str {
        &self.search_term
    }

    pub fn is_expanded(&self, id: i64) -> bool {
        self.expanded.contains(&id)
    }

    pub fn no_results(&self) -> bool {
        matches!(self.phase, BrowsePhase::Loaded) && self.posts.is_empty()
    }

    pub fn has_pending_search(&self) -> bool {
        self.debounce.is_some()
    }

    pub fn card_view<'a>(&self, post: &'a Post) -> CardView<'a> {
        if self.expanded.contains(&post.id) {
            CardView::Expanded {
                content_html: &post.content,
                gallery: post.gallery(),
            }
        } else {
            CardView::Collapsed {
                excerpt: excerpt::collapsed_excerpt(post.excerpt.as_deref(), &post.content),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::SiteError;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::mpsc::{self, UnboundedReceiver};
    use tokio::sync::Mutex;

    struct MockListing {
        calls: AtomicUsize,
        seen: Mutex<Vec<(u32, String)>>,
        responses: Mutex<VecDeque<Result<PostPage>>>,
    }

    impl MockListing {
        fn new() -> Self {
            Self::with_responses(Vec::new())
        }

        fn with_responses(responses: Vec<Result<PostPage>>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
                responses: Mutex::new(responses.into()),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        async fn seen_queries(&self) -> Vec<(u32, String)> {
            self.seen.lock().await.clone()
        }
    }

    #[async_trait::async_trait]
    impl PostListing for MockListing {
        async fn fetch_page(&self, page: u32, search: &str) -> Result<PostPage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().await.push((page, search.to_string()));
            match self.responses.lock().await.pop_front() {
                Some(result) => result,
                None => Ok(PostPage {
                    posts: vec![],
                    pages: 1,
                }),
            }
        }
    }

    fn titled(title: &str) -> Post {
        Post {
            id: 1,
            title: title.to_string(),
            excerpt: None,
            content: String::new(),
            images: vec![],
            created_at: String::new(),
        }
    }

    async fn pump(
        browser: &mut PostBrowser<MockListing>,
        events: &mut UnboundedReceiver<BrowseEvent>,
    ) {
        for _ in 0..4 {
            tokio::task::yield_now().await;
            while let Ok(event) = events.try_recv() {
                browser.handle(event);
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_keystrokes_commit_a_single_search() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let listing = Arc::new(MockListing::new());
        let mut browser = PostBrowser::new(Arc::clone(&listing), tx);
        browser.start();
        pump(&mut browser, &mut rx).await;
        assert_eq!(listing.calls(), 1);

        for text in ["c", "ce", "ceiling"] {
            browser.handle(BrowseEvent::SearchInput(text.to_string()));
            pump(&mut browser, &mut rx).await;
            tokio::time::advance(Duration::from_millis(200)).await;
            pump(&mut browser, &mut rx).await;
        }

        // 安靜期未滿：輸入框先行，查詢還沒送出
        assert_eq!(browser.search_input(), "ceiling");
        assert_eq!(browser.committed_search(), "");
        assert!(browser.has_pending_search());
        assert_eq!(listing.calls(), 1);

        tokio::time::advance(Duration::from_millis(400)).await;
        pump(&mut browser, &mut rx).await;

        assert_eq!(browser.committed_search(), "ceiling");
        assert!(!browser.has_pending_search());
        assert_eq!(listing.calls(), 2);
        assert_eq!(
            listing.seen_queries().await,
            vec![(1, String::new()), (1, "ceiling".to_string())]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_committing_a_search_returns_to_the_first_page() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let listing = Arc::new(MockListing::new());
        let mut browser = PostBrowser::new(Arc::clone(&listing), tx);
        browser.start();
        pump(&mut browser, &mut rx).await;

        browser.handle(BrowseEvent::PageSelected(3));
        pump(&mut browser, &mut rx).await;
        assert_eq!(browser.page(), 3);

        browser.handle(BrowseEvent::SearchInput("sofa".to_string()));
        pump(&mut browser, &mut rx).await;
        tokio::time::advance(Duration::from_millis(400)).await;
        pump(&mut browser, &mut rx).await;

        assert_eq!(browser.page(), 1);
        assert_eq!(
            listing.seen_queries().await,
            vec![
                (1, String::new()),
                (3, String::new()),
                (1, "sofa".to_string())
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_page_change_keeps_the_committed_search() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let listing = Arc::new(MockListing::new());
        let mut browser = PostBrowser::new(Arc::clone(&listing), tx);
        browser.start();
        pump(&mut browser, &mut rx).await;

        browser.handle(BrowseEvent::SearchInput("sofa".to_string()));
        pump(&mut browser, &mut rx).await;
        tokio::time::advance(Duration::from_millis(400)).await;
        pump(&mut browser, &mut rx).await;

        browser.handle(BrowseEvent::PageSelected(2));
        pump(&mut browser, &mut rx).await;

        assert_eq!(browser.committed_search(), "sofa");
        let seen = listing.seen_queries().await;
        assert_eq!(seen.last(), Some(&(2, "sofa".to_string())));
    }

    #[tokio::test(start_paused = true)]
    async fn test_settling_on_the_committed_term_fetches_nothing() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let listing = Arc::new(MockListing::new());
        let mut browser = PostBrowser::new(Arc::clone(&listing), tx);
        browser.start();
        pump(&mut browser, &mut rx).await;

        browser.handle(BrowseEvent::SearchInput("sofa".to_string()));
        pump(&mut browser, &mut rx).await;
        tokio::time::advance(Duration::from_millis(400)).await;
        pump(&mut browser, &mut rx).await;
        assert_eq!(listing.calls(), 2);

        browser.handle(BrowseEvent::PageSelected(2));
        pump(&mut browser, &mut rx).await;
        assert_eq!(listing.calls(), 3);

        // 改了又改回原字：安靜期過後不該重抓、也不該跳回第一頁
        browser.handle(BrowseEvent::SearchInput("sof".to_string()));
        browser.handle(BrowseEvent::SearchInput("sofa".to_string()));
        pump(&mut browser, &mut rx).await;
        tokio::time::advance(Duration::from_millis(400)).await;
        pump(&mut browser, &mut rx).await;

        assert_eq!(listing.calls(), 3);
        assert_eq!(browser.page(), 2);
        assert_eq!(*browser.phase(), BrowsePhase::Loaded);
    }

    #[tokio::test(start_paused = true)]
    async fn test_page_zero_and_current_page_are_ignored() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let listing = Arc::new(MockListing::new());
        let mut browser = PostBrowser::new(Arc::clone(&listing), tx);
        browser.start();
        pump(&mut browser, &mut rx).await;
        assert_eq!(listing.calls(), 1);

        browser.handle(BrowseEvent::PageSelected(0));
        browser.handle(BrowseEvent::PageSelected(1));
        pump(&mut browser, &mut rx).await;

        assert_eq!(browser.page(), 1);
        assert_eq!(listing.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_fetch_results_are_discarded() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let listing = Arc::new(MockListing::with_responses(vec![
            Ok(PostPage {
                posts: vec![],
                pages: 9,
            }),
            Ok(PostPage {
                posts: vec![titled("stale")],
                pages: 9,
            }),
            Ok(PostPage {
                posts: vec![titled("fresh")],
                pages: 5,
            }),
        ]));
        let mut browser = PostBrowser::new(Arc::clone(&listing), tx);
        browser.start();
        pump(&mut browser, &mut rx).await;

        // 讓第一個請求完成但先不領取回應，再疊上第二個請求
        browser.handle(BrowseEvent::PageSelected(2));
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
        browser.handle(BrowseEvent::PageSelected(3));
        pump(&mut browser, &mut rx).await;

        assert_eq!(listing.calls(), 3);
        assert_eq!(*browser.phase(), BrowsePhase::Loaded);
        assert_eq!(browser.posts()[0].title, "fresh");
        assert_eq!(browser.total_pages(), 5);
        assert_eq!(browser.page(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_result_set_is_loaded_not_error() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let listing = Arc::new(MockListing::new());
        let mut browser = PostBrowser::new(Arc::clone(&listing), tx);
        browser.start();
        assert_eq!(*browser.phase(), BrowsePhase::Loading);
        pump(&mut browser, &mut rx).await;

        assert_eq!(*browser.phase(), BrowsePhase::Loaded);
        assert!(browser.no_results());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_failure_surfaces_friendly_error_and_recovers() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let listing = Arc::new(MockListing::with_responses(vec![Err(
            SiteError::HttpStatus {
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            },
        )]));
        let mut browser = PostBrowser::new(Arc::clone(&listing), tx);
        browser.start();
        pump(&mut browser, &mut rx).await;

        assert_eq!(
            *browser.phase(),
            BrowsePhase::Error("Server error (HTTP 500). Please try again later.".to_string())
        );
        assert!(!browser.no_results());

        browser.handle(BrowseEvent::PageSelected(2));
        assert_eq!(*browser.phase(), BrowsePhase::Loading);
        pump(&mut browser, &mut rx).await;
        assert_eq!(*browser.phase(), BrowsePhase::Loaded);
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_expand_switches_the_card_view() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let post = Post {
            id: 7,
            title: "Coffered ceiling".to_string(),
            excerpt: None,
            content: "<p>Hello</p>".to_string(),
            images: vec!["a.jpg".to_string(), "b.jpg".to_string(), "c.jpg".to_string()],
            created_at: String::new(),
        };
        let listing = Arc::new(MockListing::with_responses(vec![Ok(PostPage {
            posts: vec![post.clone()],
            pages: 1,
        })]));
        let mut browser = PostBrowser::new(Arc::clone(&listing), tx);
        browser.start();
        pump(&mut browser, &mut rx).await;

        assert!(!browser.is_expanded(7));
        assert_eq!(
            browser.card_view(&post),
            CardView::Collapsed {
                excerpt: "Hello".to_string()
            }
        );

        browser.handle(BrowseEvent::ToggleExpand(7));
        assert!(browser.is_expanded(7));
        assert_eq!(
            browser.card_view(&post),
            CardView::Expanded {
                content_html: "<p>Hello</p>",
                gallery: &post.images[1..],
            }
        );

        browser.handle(BrowseEvent::ToggleExpand(7));
        assert!(!browser.is_expanded(7));
    }
}
