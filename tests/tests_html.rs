#[cfg(test)]
mod html_parser_tests {
    use html_reader::{NodeType, ParseOptions, Parser};

    #[test]
    fn test_paragraph_lookup() {
        let doc = Parser::new()
            .parse("<html><body><p>hi</p></body></html>")
            .unwrap();

        let paragraphs = doc.get_elements_by_tag_name("P");
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].text_content(), "hi");
    }

    #[test]
    fn test_element_nesting_and_attributes() {
        let doc = Parser::new()
            .parse("<html><body class=\"main\" data-x=\"1\"><div><span>t</span></div></body></html>")
            .unwrap();

        let html = doc.root_element().unwrap();
        assert_eq!(html.name(), "HTML");

        let body = html.first_child().unwrap();
        assert_eq!(body.name(), "BODY");
        assert_eq!(body.attribute("CLASS"), Some("main"));
        assert_eq!(body.attribute("DATA-X"), Some("1"));

        let div = body.first_child().unwrap();
        let span = div.first_child().unwrap();
        assert_eq!(span.name(), "SPAN");
        assert_eq!(span.parent().unwrap().name(), "DIV");
    }

    #[test]
    fn test_case_canonicalization() {
        let doc = Parser::new().parse("<A HREF=\"x\"></A>").unwrap();
        let link = doc.root_element().unwrap();

        assert_eq!(link.name(), "A");
        let attrs: Vec<_> = link.attributes().collect();
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].name(), "HREF");
        assert_eq!(attrs[0].value(), "x");
    }

    #[test]
    fn test_mixed_case_end_tag() {
        let doc = Parser::new().parse("<p>x</P>").unwrap();
        let paragraph = doc.root_element().unwrap();

        assert_eq!(paragraph.name(), "P");
        let children: Vec<_> = paragraph.children().collect();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].value(), "x");
    }

    #[test]
    fn test_void_element_closure() {
        let doc = Parser::new().parse("<p>x<br>y</p>").unwrap();
        let paragraph = doc.root_element().unwrap();

        let children: Vec<_> = paragraph.children().collect();
        assert_eq!(children.len(), 3);
        assert_eq!(children[0].value(), "x");
        assert_eq!(children[1].name(), "BR");
        assert_eq!(children[2].value(), "y");

        assert!(!children[1].has_children());
        assert_eq!(children[1].parent().unwrap().name(), "P");
    }

    #[test]
    fn test_implicit_list_close() {
        let doc = Parser::new().parse("<ul><li>a<li>b</ul>").unwrap();
        let list = doc.root_element().unwrap();

        let items: Vec<_> = list.children().collect();
        assert_eq!(items.len(), 2);
        assert!(items[0].is("LI"));
        assert!(items[1].is("LI"));
        assert_eq!(items[0].text_content(), "a");
        assert_eq!(items[1].text_content(), "b");
        assert_eq!(items[0].next_sibling().unwrap(), items[1]);
    }

    #[test]
    fn test_implicit_list_close_three_items() {
        let doc = Parser::new().parse("<ul><li>1<li>2<li>3</ul>").unwrap();
        let list = doc.root_element().unwrap();

        let items: Vec<_> = list.children().collect();
        assert_eq!(items.len(), 3);
        for (item, expected) in items.iter().zip(["1", "2", "3"]) {
            assert_eq!(item.text_content(), expected);
        }
    }

    #[test]
    fn test_implicit_table_close() {
        let doc = Parser::new()
            .parse("<table><tr><td>a<td>b</tr></table>")
            .unwrap();

        let table = doc.root_element().unwrap();
        let row = table.first_child().unwrap();
        assert!(row.is("TR"));

        let cells: Vec<_> = row.children().collect();
        assert_eq!(cells.len(), 2);
        assert!(cells[0].is("TD"));
        assert!(cells[1].is("TD"));
        assert_eq!(cells[0].text_content(), "a");
        assert_eq!(cells[1].text_content(), "b");
    }

    #[test]
    fn test_paragraph_closed_by_sibling() {
        let doc = Parser::new().parse("<div><p>one<p>two</div>").unwrap();
        let division = doc.root_element().unwrap();

        let paragraphs: Vec<_> = division.children().collect();
        assert_eq!(paragraphs.len(), 2);
        assert!(paragraphs.iter().all(|node| node.is("P")));
    }

    #[test]
    fn test_script_body_is_not_tokenized() {
        let doc = Parser::new()
            .parse("<script>if (a<b) { x }</script>")
            .unwrap();

        let script = doc.root_element().unwrap();
        assert_eq!(script.name(), "SCRIPT");

        let children: Vec<_> = script.children().collect();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].node_type(), NodeType::CData);
        assert_eq!(children[0].value(), "if (a<b) { x }");
    }

    #[test]
    fn test_get_element_by_id() {
        let doc = Parser::new()
            .parse("<a id=\"x\"><a id=\"y\"/></a>")
            .unwrap();

        let inner = doc.get_element_by_id("y").unwrap();
        let outer = doc.get_element_by_id("x").unwrap();

        assert_eq!(inner.parent().unwrap(), outer);
        assert_eq!(outer.parent().unwrap(), doc.document_node());
        assert!(doc.get_element_by_id("z").is_none());
    }

    #[test]
    fn test_links() {
        let doc = Parser::new()
            .parse("<map><area href=\"1\"></map><a href=\"2\"></a><b></b>")
            .unwrap();

        let links = doc.links();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].name(), "AREA");
        assert_eq!(links[1].name(), "A");
    }

    #[test]
    fn test_element_numbering() {
        let doc = Parser::new()
            .parse("<html><body><p>x</p><p>y</p></body></html>")
            .unwrap();

        let numbers: Vec<_> = doc
            .descendants()
            .filter(|node| node.is_element())
            .map(|node| node.number())
            .collect();
        assert_eq!(numbers, [1, 2, 3, 4]);

        // numbering restarts on every parse
        let doc = Parser::new().parse("<html></html>").unwrap();
        assert_eq!(doc.root_element().unwrap().number(), 1);
    }

    #[test]
    fn test_attribute_order() {
        let doc = Parser::new()
            .parse("<div zeta=\"1\" alpha=\"2\" mid=\"3\"></div>")
            .unwrap();

        let names: Vec<_> = doc
            .root_element()
            .unwrap()
            .attributes()
            .map(|attr| attr.name().to_string())
            .collect();
        assert_eq!(names, ["ZETA", "ALPHA", "MID"]);
    }

    #[test]
    fn test_unquoted_and_empty_attributes() {
        let doc = Parser::new()
            .parse("<input type=checkbox checked>")
            .unwrap();

        let input = doc.root_element().unwrap();
        assert_eq!(input.attribute("TYPE"), Some("checkbox"));
        assert_eq!(input.attribute("CHECKED"), Some(""));
    }

    #[test]
    fn test_navigation() {
        let doc = Parser::new()
            .parse("<html><body><a/></body></html>")
            .unwrap();

        let link = doc.get_elements_by_tag_name("A")[0];
        assert_eq!(link.path('/'), "HTML/BODY/A");
        assert_eq!(link.root(), doc.document_node());

        let doc = Parser::new()
            .parse("<r><a>1</a><b>2</b><a>3</a><c>4</c></r>")
            .unwrap();
        let root = doc.root_element().unwrap();
        let children: Vec<_> = root.children().collect();

        assert_eq!(children[0].next_sibling().unwrap(), children[1]);
        assert_eq!(children[3].prev_sibling().unwrap(), children[2]);
        assert!(children[0].prev_sibling().is_none());
        assert!(children[3].next_sibling().is_none());

        // closest preceding match wins
        assert_eq!(
            children[3].prev_sibling_named("A").unwrap(),
            children[2]
        );
        assert_eq!(
            children[1].prev_sibling_named("A").unwrap(),
            children[0]
        );
        assert!(children[0].prev_sibling_named("A").is_none());
    }

    #[test]
    fn test_whitespace_only_text_is_dropped_by_default() {
        let source = "<ul>\n  <li>a</li>\n  <li>b</li>\n</ul>";

        let doc = Parser::new().parse(source).unwrap();
        assert_eq!(doc.root_element().unwrap().children().count(), 2);

        let doc = Parser::with_options(ParseOptions::DEFAULT | ParseOptions::WS_PCDATA)
            .parse(source)
            .unwrap();
        assert_eq!(doc.root_element().unwrap().children().count(), 5);
    }

    #[test]
    fn test_eol_normalization() {
        let doc = Parser::new().parse("<p>a\r\nb\rc</p>").unwrap();
        assert_eq!(doc.root_element().unwrap().child_value(), Some("a\nb\nc"));

        let doc = Parser::with_options(ParseOptions::CDATA)
            .parse("<p>a\r\nb</p>")
            .unwrap();
        assert_eq!(doc.root_element().unwrap().child_value(), Some("a\r\nb"));
    }

    #[test]
    fn test_attribute_whitespace_conversion() {
        let doc = Parser::new().parse("<a title=\"x\n\ty\"></a>").unwrap();
        assert_eq!(doc.root_element().unwrap().attribute("TITLE"), Some("x  y"));

        let doc = Parser::with_options(ParseOptions::DEFAULT | ParseOptions::WNORM_ATTRIBUTE)
            .parse("<a title=\"  x \n  y  \"></a>")
            .unwrap();
        assert_eq!(doc.root_element().unwrap().attribute("TITLE"), Some("x y"));
    }

    #[test]
    fn test_comments_are_skipped_by_default() {
        let source = "<p><!-- note -->x</p>";

        let doc = Parser::new().parse(source).unwrap();
        let children: Vec<_> = doc.root_element().unwrap().children().collect();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].value(), "x");

        let doc = Parser::with_options(ParseOptions::DEFAULT | ParseOptions::COMMENTS)
            .parse(source)
            .unwrap();
        let children: Vec<_> = doc.root_element().unwrap().children().collect();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].node_type(), NodeType::Comment);
        assert_eq!(children[0].value(), " note ");
    }

    #[test]
    fn test_cdata_section() {
        let doc = Parser::new().parse("<p><![CDATA[a < b]]></p>").unwrap();
        let children: Vec<_> = doc.root_element().unwrap().children().collect();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].node_type(), NodeType::CData);
        assert_eq!(children[0].value(), "a < b");

        // the cdata option gates the node
        let doc = Parser::with_options(ParseOptions::EOL)
            .parse("<p><![CDATA[a < b]]></p>")
            .unwrap();
        assert!(!doc.root_element().unwrap().has_children());
    }

    #[test]
    fn test_doctype_nesting() {
        let source = "<!DOCTYPE html [ <!ELEMENT p ANY> ]><html></html>";

        let doc = Parser::new().parse(source).unwrap();
        let kinds: Vec<_> = doc
            .document_node()
            .children()
            .map(|node| node.node_type())
            .collect();
        assert_eq!(kinds, [NodeType::Element]);

        let doc = Parser::with_options(ParseOptions::FULL).parse(source).unwrap();
        let children: Vec<_> = doc.document_node().children().collect();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].node_type(), NodeType::DocType);
        assert_eq!(children[0].value(), "html [ <!ELEMENT p ANY> ]");
        assert_eq!(children[1].node_type(), NodeType::Element);
    }

    #[test]
    fn test_declaration_and_processing_instruction() {
        let source = "<?xml version=\"1.0\"?><?php echo 1; ?><html></html>";

        let doc = Parser::new().parse(source).unwrap();
        assert_eq!(doc.document_node().children().count(), 1);

        let doc = Parser::with_options(ParseOptions::FULL).parse(source).unwrap();
        let children: Vec<_> = doc.document_node().children().collect();
        assert_eq!(children.len(), 3);
        assert_eq!(children[0].node_type(), NodeType::Declaration);
        assert_eq!(children[0].name(), "XML");
        assert_eq!(children[0].value(), "version=\"1.0\"");
        assert_eq!(children[1].node_type(), NodeType::ProcessingInstruction);
        assert_eq!(children[1].name(), "PHP");
        assert_eq!(children[1].value(), "echo 1;");
    }

    #[test]
    fn test_nul_terminated_input() {
        let doc = Parser::new()
            .parse_bytes(b"<p>x</p>\0trailing garbage")
            .unwrap();
        assert_eq!(doc.root_element().unwrap().text_content(), "x");
    }

    #[test]
    fn test_empty_input_yields_empty_document() {
        let doc = Parser::new().parse("").unwrap();
        assert!(doc.is_empty());
        assert!(doc.root_element().is_none());
    }

    #[test]
    fn test_text_at_document_level() {
        let doc = Parser::new().parse("hello").unwrap();
        assert!(!doc.is_empty());
        assert_eq!(doc.document_node().first_child().unwrap().value(), "hello");
    }
}
