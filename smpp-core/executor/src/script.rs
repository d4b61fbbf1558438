//! 脚本文档树
//!
//! 编译器只消费 [`ScriptElement`] 树；XML 读取用 quick-xml 完成。

use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

/// 脚本读取错误
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("读取脚本文件失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML 解析失败 (位置 {position}): {message}")]
    Xml { position: usize, message: String },

    #[error("脚本结构错误: {0}")]
    Structure(String),
}

/// 脚本中的一个元素
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<ScriptElement>,
}

impl ScriptElement {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text.push_str(text);
        self
    }

    pub fn with_child(mut self, child: ScriptElement) -> Self {
        self.children.push(child);
        self
    }

    /// `<name>text</name>` 形式的子元素
    pub fn with_field(self, name: &str, text: &str) -> Self {
        self.with_child(ScriptElement::new(name).with_text(text))
    }

    /// 元素名是否匹配（不区分大小写）
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// 第一个同名子元素（区分大小写）
    pub fn child(&self, name: &str) -> Option<&ScriptElement> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ScriptElement> {
        self.children.iter().filter(move |c| c.name == name)
    }

    pub fn text_trim(&self) -> &str {
        self.text.trim()
    }

    /// 从 XML 文本解析
    pub fn parse_str(xml: &str) -> Result<Self, ScriptError> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(false);

        let mut stack: Vec<ScriptElement> = Vec::new();
        let mut root: Option<ScriptElement> = None;

        loop {
            let position = reader.buffer_position();
            let xml_err = |e: quick_xml::Error| ScriptError::Xml {
                position,
                message: e.to_string(),
            };

            match reader.read_event().map_err(xml_err)? {
                Event::Start(start) => stack.push(element_from(&start, position)?),
                Event::Empty(start) => {
                    let element = element_from(&start, position)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| ScriptError::Structure("多余的结束标签".to_string()))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&text.unescape().map_err(xml_err)?);
                    }
                }
                Event::CData(data) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&String::from_utf8_lossy(&data));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(ScriptError::Structure(format!("元素 <{}> 未关闭", open.name)));
        }
        root.ok_or_else(|| ScriptError::Structure("脚本为空".to_string()))
    }

    /// 从文件解析
    pub fn parse_file(path: &Path) -> Result<Self, ScriptError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_str(&content)
    }
}

fn element_from(start: &BytesStart<'_>, position: usize) -> Result<ScriptElement, ScriptError> {
    let mut element = ScriptElement::new(&String::from_utf8_lossy(start.name().as_ref()));

    for attr in start.attributes() {
        let attr = attr.map_err(|e| ScriptError::Xml {
            position,
            message: e.to_string(),
        })?;
        let value = attr.unescape_value().map_err(|e| ScriptError::Xml {
            position,
            message: e.to_string(),
        })?;
        element.attributes.push((
            String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
            value.into_owned(),
        ));
    }
    Ok(element)
}

fn attach(
    stack: &mut [ScriptElement],
    root: &mut Option<ScriptElement>,
    element: ScriptElement,
) -> Result<(), ScriptError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(ScriptError::Structure(format!(
                "多个根元素: <{}>",
                element.name
            )))
        }
    }
    Ok(())
}
