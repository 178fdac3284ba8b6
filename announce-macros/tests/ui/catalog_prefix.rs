use announce::{Catalog, Topic, catalog};

#[catalog(prefix = "job.")]
struct JobTopics {
    started: u64,
    #[topic(name = "done")]
    finished: Result<u64, String>,
    r#type: &'static str,
}

// 生成的常量可用于 const 上下文
const STARTED: Topic<u64> = JobTopics::STARTED;

fn main() {
    assert_eq!(JobTopics::TOPICS, &["job.started", "job.done", "job.type"]);
    assert_eq!(STARTED.to_string(), "job.started");
    assert_eq!(JobTopics::FINISHED.to_string(), "job.done");
    assert_eq!(JobTopics::TYPE.to_string(), "job.type");
}
