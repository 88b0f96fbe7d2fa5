//! Boilerplate files written by the makers.
//!
//! Placeholders use the `{{key}}` syntax of [`crate::core::template`].

/// WSGI bootstrap of a site.
pub const ROOT_PY: &str = r#"#!/usr/bin/env python
import sys
sys.stdout = sys.stderr
from gnr.web.gnrwsgisite import GnrWsgiSite
site = GnrWsgiSite(__file__)

def application(environ,start_response):
    return site(environ,start_response)

if __name__ == '__main__':
    from gnr.web.server import NewServer
    server=NewServer(__file__)
    server.run()
"#;

/// Package module. `{{sqlprefix}}` is a complete `sqlprefix=...,` fragment
/// or empty.
pub const MAIN_PY: &str = r#"#!/usr/bin/env python
# encoding: utf-8
from gnr.app.gnrdbo import GnrDboTable, GnrDboPackage

class Package(GnrDboPackage):
    def config_attributes(self):
        return dict(comment='{{comment}}',sqlschema='{{sqlschema}}',{{sqlprefix}}
                    name_short='{{name_short}}', name_long='{{name_long}}', name_full='{{name_full}}',
                    login_url='{{login_url}}')

    def config_db(self, pkg):
        pass

class Table(GnrDboTable):
    pass
"#;

/// Framed index page of a package.
pub const INDEX_PY: &str = r#"# -*- coding: UTF-8 -*-

class GnrCustomWebPage(object):
    py_requires = 'plainindex'
"#;

/// Optional hello-world page of a package.
pub const HELLO_WORLD_PY: &str = r#"# -*- coding: UTF-8 -*-

class GnrCustomWebPage(object):
    def main(self,root,**kwargs):
        root.h1('Hello world',text_align='center')
"#;
