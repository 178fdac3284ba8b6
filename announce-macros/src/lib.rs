use proc_macro::TokenStream;

mod catalog;
mod utils;

/// 主题目录宏
/// - 用于具名字段结构体：每个字段声明一个主题，字段类型即该主题的载荷类型
/// - 为每个字段生成大写同名的 `::announce::Topic<T>` 关联常量
/// - 自动实现 `::announce::Catalog`（`TOPICS` 为全部主题名，按字段顺序）
/// - 支持参数：`#[catalog(prefix = "app.")]`，为全部主题名追加前缀
/// - 字段属性：`#[topic(name = "user.created")]` 覆写主题名（默认取字段名）
///
/// ```ignore
/// #[catalog]
/// pub struct AppTopics {
///     number: i32,
///     void: (),
/// }
///
/// announcement.emit(&AppTopics::NUMBER, 1);
/// announcement.signal(&AppTopics::VOID);
/// ```
#[proc_macro_attribute]
pub fn catalog(attr: TokenStream, item: TokenStream) -> TokenStream {
    catalog::expand(attr.into(), item.into())
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
