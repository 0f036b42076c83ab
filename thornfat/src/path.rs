//! 路径工具。
//!
//! 驱动内部只处理[`simplify`]过的路径：以`/`开头，
//! 没有空段、`.`或`..`，除根目录外不以`/`结尾。

use alloc::string::String;
use alloc::vec::Vec;

/// 规整路径。相对路径视为从根开始，`..`越过根时停在根。
pub fn simplify(path: &str) -> String {
    let mut stack: Vec<&str> = Vec::new();
    for cmp in components(path) {
        match cmp {
            "." => {}
            ".." => {
                stack.pop();
            }
            cmp => stack.push(cmp),
        }
    }

    if stack.is_empty() {
        return String::from("/");
    }

    let mut out = String::with_capacity(path.len());
    for cmp in stack {
        out.push('/');
        out.push_str(cmp);
    }
    out
}

/// 非空的路径段
pub fn components(path: &str) -> impl DoubleEndedIterator<Item = &str> {
    path.split('/').filter(|cmp| !cmp.is_empty())
}

/// 最后一段，根目录为空串。
pub fn basename(path: &str) -> &str {
    components(path).next_back().unwrap_or("")
}

/// `path`是否位于`ancestor`之下（不含其本身）
pub fn is_within(path: &str, ancestor: &str) -> bool {
    if ancestor == "/" {
        return path != "/";
    }
    path.strip_prefix(ancestor)
        .is_some_and(|rest| rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simplify_path() {
        assert_eq!("/", simplify(""));
        assert_eq!("/", simplify("/"));
        assert_eq!("/", simplify("/.."));
        assert_eq!("/", simplify("../.."));
        assert_eq!("/a/b", simplify("a//b/"));
        assert_eq!("/a/c", simplify("/a/./b/../c"));
        assert_eq!("/c", simplify("/a/../../c"));
    }

    #[test]
    fn split_path() {
        assert_eq!("c", basename("/a/b/c"));
        assert_eq!("", basename("/"));
    }

    #[test]
    fn subtree() {
        assert!(is_within("/a/b", "/a"));
        assert!(!is_within("/ab", "/a"));
        assert!(!is_within("/a", "/a"));
        assert!(is_within("/a", "/"));
    }
}
