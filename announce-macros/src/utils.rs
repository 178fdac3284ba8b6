use syn::ext::IdentExt;
use syn::{Attribute, Field, LitStr};

// 字段对应的主题名：优先取 #[topic(name = "...")]，否则取字段名（去掉 r# 前缀）
pub(crate) fn field_topic_name(field: &Field) -> syn::Result<String> {
    let mut name: Option<LitStr> = None;

    for attr in field.attrs.iter().filter(|a| a.path().is_ident("topic")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                if name.is_some() {
                    return Err(meta.error("duplicate key 'name' in attribute"));
                }
                name = Some(meta.value()?.parse()?);
                Ok(())
            } else {
                Err(meta.error("unknown key in attribute; expected 'name'"))
            }
        })?;
    }

    match (name, field.ident.as_ref()) {
        (Some(lit), _) => Ok(lit.value()),
        (None, Some(ident)) => Ok(ident.unraw().to_string()),
        (None, None) => Err(syn::Error::new_spanned(
            field,
            "unnamed field requires #[topic(name = \"...\")]",
        )),
    }
}

// 移除已消费的 #[topic] 属性，其余属性原样保留
pub(crate) fn strip_topic_attrs(attrs: &mut Vec<Attribute>) {
    attrs.retain(|a| !a.path().is_ident("topic"));
}
