use announce::{Announcement, Catalog, catalog};
use std::cell::Cell;
use std::rc::Rc;

#[catalog]
pub struct AppTopics {
    number: i32,
    void: (),
    #[topic(name = "user.created")]
    user_created: String,
}

fn main() {
    assert_eq!(AppTopics::TOPICS, &["number", "void", "user.created"]);
    assert_eq!(AppTopics::USER_CREATED.to_string(), "user.created");

    let announcement = Announcement::new();
    let total = Rc::new(Cell::new(0));

    let sum = total.clone();
    let _listener = announcement.on(&AppTopics::NUMBER, move |n| sum.set(sum.get() + *n));

    // 载荷类型由目录在编译期约束：NUMBER 只接受 i32，VOID 不接受参数
    assert!(announcement.emit(&AppTopics::NUMBER, 2));
    assert!(!announcement.signal(&AppTopics::VOID));
    assert!(!announcement.emit(&AppTopics::USER_CREATED, "alice".to_string()));
    assert_eq!(total.get(), 2);
}
