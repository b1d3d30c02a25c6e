//! Static table of contents for the hosted Swift book translation. The
//! chapter list is fixed at build time; only the docs base URL is configurable.

#[derive(Debug, Clone)]
pub struct Chapter {
    pub title: &'static str,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone)]
pub struct Section {
    pub title: &'static str,
    pub url: String,
}

fn section(base_url: &str, title: &'static str, slug: &str) -> Section {
    Section {
        title,
        url: format!("{}/{}", base_url.trim_end_matches('/'), slug),
    }
}

pub fn chapters(base_url: &str) -> Vec<Chapter> {
    vec![
        Chapter {
            title: "Welcome to Swift",
            sections: vec![
                section(base_url, "About Swift", "aboutswift"),
                section(base_url, "Version Compatibility", "compatibility"),
            ],
        },
        Chapter {
            title: "Language Guide",
            sections: vec![
                section(base_url, "The Basics", "thebasics"),
                section(base_url, "Basic Operators", "basicoperators"),
                section(base_url, "Strings and Characters", "stringsandcharacters"),
                section(base_url, "Collection Types", "collectiontypes"),
                section(base_url, "Control Flow", "controlflow"),
                section(base_url, "Functions", "functions"),
                section(base_url, "Closures", "closures"),
                section(base_url, "Enumerations", "enumerations"),
                section(base_url, "Structures and Classes", "classesandstructures"),
                section(base_url, "Properties", "properties"),
                section(base_url, "Methods", "methods"),
                section(base_url, "Subscripts", "subscripts"),
                section(base_url, "Inheritance", "inheritance"),
                section(base_url, "Initialization", "initialization"),
                section(base_url, "Deinitialization", "deinitialization"),
                section(base_url, "Optional Chaining", "optionalchaining"),
                section(base_url, "Error Handling", "errorhandling"),
                section(base_url, "Concurrency", "concurrency"),
                section(base_url, "Type Casting", "typecasting"),
                section(base_url, "Nested Types", "nestedtypes"),
                section(base_url, "Extensions", "extensions"),
                section(base_url, "Protocols", "protocols"),
                section(base_url, "Generics", "generics"),
                section(base_url, "Opaque Types", "opaquetypes"),
                section(base_url, "Automatic Reference Counting", "automaticreferencecounting"),
                section(base_url, "Memory Safety", "memorysafety"),
                section(base_url, "Access Control", "accesscontrol"),
                section(base_url, "Advanced Operators", "advancedoperators"),
            ],
        },
        Chapter {
            title: "Language Reference",
            sections: vec![
                section(base_url, "About the Language Reference", "aboutthelanguagereference"),
                section(base_url, "Lexical Structure", "lexicalstructure"),
                section(base_url, "Types", "types"),
                section(base_url, "Expressions", "expressions"),
                section(base_url, "Declarations", "declarations"),
                section(base_url, "Attributes", "attributes"),
                section(base_url, "Patterns", "patterns"),
                section(base_url, "Summary of the Grammar", "summaryofthegrammar"),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chapters_shape() {
        let chapters = chapters("https://docs.example.com/swift-book");
        assert_eq!(chapters.len(), 3);
        assert_eq!(chapters[1].sections.len(), 28);
        assert_eq!(
            chapters[0].sections[0].url,
            "https://docs.example.com/swift-book/aboutswift"
        );
    }

    #[test]
    fn test_trailing_slash_base() {
        let chapters = chapters("https://docs.example.com/swift-book/");
        assert_eq!(
            chapters[2].sections[0].url,
            "https://docs.example.com/swift-book/aboutthelanguagereference"
        );
    }
}
